//! Application state management

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;
use worduel_core::{Database, Identity, IdentityRepository, Result, Route};
use worduel_net::DuelService;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot notification (not persisted)
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Session context shared by every view model
pub struct AppState<S> {
    pub db: Arc<Mutex<Database>>,
    pub service: Arc<S>,
    pub config: Config,
    identity: Arc<Mutex<Option<Identity>>>,
    route: Arc<Mutex<Route>>,
    notices: Arc<Mutex<Vec<Notice>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: DuelService> AppState<S> {
    /// Open the identity database under `data_dir`
    pub fn new(config: Config, service: S, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db = Database::open(data_dir.join("worduel.db"))?;
        Self::with_database(config, service, db)
    }

    pub fn with_database(config: Config, service: S, db: Database) -> Result<Self> {
        let identity = db.load_identity()?;
        if let Some(identity) = &identity {
            info!(user_id = %identity.id, username = %identity.username, "Loaded identity");
        }

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            service: Arc::new(service),
            config,
            identity: Arc::new(Mutex::new(identity)),
            route: Arc::new(Mutex::new(Route::Home)),
            notices: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn identity(&self) -> Option<Identity> {
        lock(&self.identity).clone()
    }

    pub fn identity_id(&self) -> Option<String> {
        lock(&self.identity).as_ref().map(|i| i.id.clone())
    }

    /// Persist a freshly registered identity
    pub fn set_identity(&self, identity: Identity) -> Result<()> {
        lock(&self.db).save_identity(&identity)?;
        *lock(&self.identity) = Some(identity);
        Ok(())
    }

    pub fn clear_identity(&self) -> Result<()> {
        lock(&self.db).clear_identity()?;
        *lock(&self.identity) = None;
        Ok(())
    }

    /// Drop a stored identity the service no longer knows
    ///
    /// Transport failures keep the identity; only an explicit `null` from
    /// the service clears it.
    pub async fn verify_identity(&self) -> Result<()> {
        let Some(user_id) = self.identity_id() else {
            return Ok(());
        };

        match self.service.get_user(&user_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                warn!(%user_id, "Stored identity unknown to service, clearing");
                self.clear_identity()
            }
            Err(e) => {
                warn!(%user_id, error = %e, "Could not verify identity");
                Ok(())
            }
        }
    }

    pub fn route(&self) -> Route {
        lock(&self.route).clone()
    }

    pub fn navigate(&self, route: Route) {
        let mut current = lock(&self.route);
        if *current != route {
            info!(?route, "Navigating");
            *current = route;
        }
    }

    pub fn notify(&self, kind: NoticeKind, text: impl Into<String>) {
        let notice = Notice {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        };
        debug!(notice_id = %notice.id, kind = ?notice.kind, text = %notice.text, "Notice");
        lock(&self.notices).push(notice);
    }

    pub fn notify_error(&self, text: impl Into<String>) {
        self.notify(NoticeKind::Error, text);
    }

    /// Take all pending notices, oldest first
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.notices))
    }
}

//! Username registration view model

use tracing::{info, warn};
use worduel_core::Identity;
use worduel_net::DuelService;

use crate::state::{AppState, NoticeKind};

const GENERIC_FAILURE: &str = "Something went wrong";

/// Register `name` with the service and keep the identity locally
///
/// Returns true once an identity is stored.
pub async fn register<S: DuelService>(state: &AppState<S>, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        state.notify_error("Please enter a username");
        return false;
    }

    let id = match state.service.create_user(name).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!(username = name, "Registration returned no id");
            state.notify_error(GENERIC_FAILURE);
            return false;
        }
        Err(e) => {
            warn!(username = name, error = %e, "Registration failed");
            state.notify_error(e.to_string());
            return false;
        }
    };

    if let Err(e) = state.set_identity(Identity::new(id.clone(), name.to_string())) {
        state.notify_error(format!("Could not save identity: {}", e));
        return false;
    }

    info!(user_id = %id, username = name, "Registered");
    state.notify(NoticeKind::Success, format!("Welcome, {}!", name));
    true
}

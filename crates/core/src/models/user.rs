//! User and identity models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DuelSummary;

/// The locally stored "who am I" record
///
/// Created once by username registration. The id is issued by the duel
/// service; nothing else on the client writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(id: String, username: String) -> Self {
        Self {
            id,
            username,
            created_at: Utc::now(),
        }
    }
}

/// A user as referenced from games and duels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A user together with the duels they take part in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub duels: Vec<DuelSummary>,
}

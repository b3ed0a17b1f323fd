//! Storage repository traits
//!
//! The identity is the only thing the client persists. Keeping it behind a
//! trait lets view models run against any backing store.

use crate::error::Result;
use crate::models::Identity;

/// Local identity persistence
pub trait IdentityRepository {
    /// The stored identity, if registration happened on this machine
    fn load_identity(&self) -> Result<Option<Identity>>;

    /// Store the identity, replacing any previous one
    fn save_identity(&self, identity: &Identity) -> Result<()>;

    /// Forget the identity (e.g., the service no longer knows it)
    fn clear_identity(&self) -> Result<()>;
}

//! Local identity storage
//!
//! One row at most: the user this machine registered as.

use rusqlite::{params, Connection};
use tracing::{info, instrument};

use super::parse::{parse_datetime, OptionalExt};
use crate::error::Result;
use crate::models::Identity;

pub struct IdentityStore<'a> {
    conn: &'a Connection,
}

impl<'a> IdentityStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Store the identity, replacing any previous one
    #[instrument(skip(self, identity), fields(username = %identity.username))]
    pub fn save(&self, identity: &Identity) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO identity (slot, user_id, username, created_at)
             VALUES (1, ?1, ?2, ?3)",
            params![
                identity.id,
                identity.username,
                identity.created_at.to_rfc3339(),
            ],
        )?;
        info!(user_id = %identity.id, "Identity saved");
        Ok(())
    }

    /// Load the stored identity
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Option<Identity>> {
        let identity = self
            .conn
            .query_row(
                "SELECT user_id, username, created_at FROM identity WHERE slot = 1",
                [],
                |row| {
                    Ok(Identity {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: parse_datetime(&row.get::<_, String>(2)?)?,
                    })
                },
            )
            .optional()?;

        Ok(identity)
    }

    /// Remove the stored identity
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM identity", [])?;
        if removed > 0 {
            info!("Identity cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Database, IdentityRepository};
    use crate::models::Identity;

    #[test]
    fn test_identity_save_load() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_identity().unwrap().is_none());

        let identity = Identity::new("0x1f".into(), "alice".into());
        db.save_identity(&identity).unwrap();

        let loaded = db.load_identity().unwrap().unwrap();
        assert_eq!(loaded.id, "0x1f");
        assert_eq!(loaded.username, "alice");
    }

    #[test]
    fn test_identity_replaced() {
        let db = Database::open_in_memory().unwrap();
        db.save_identity(&Identity::new("1".into(), "alice".into())).unwrap();
        db.save_identity(&Identity::new("2".into(), "bob".into())).unwrap();

        let loaded = db.load_identity().unwrap().unwrap();
        assert_eq!(loaded.id, "2");
    }

    #[test]
    fn test_identity_clear() {
        let db = Database::open_in_memory().unwrap();
        db.save_identity(&Identity::new("1".into(), "alice".into())).unwrap();
        db.clear_identity().unwrap();
        assert!(db.load_identity().unwrap().is_none());

        // clearing twice is fine
        db.clear_identity().unwrap();
    }

    #[test]
    fn test_identity_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worduel.db");
        {
            let db = Database::open(&path).unwrap();
            db.save_identity(&Identity::new("7".into(), "carol".into())).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.load_identity().unwrap().unwrap().username, "carol");
    }
}

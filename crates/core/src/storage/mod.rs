//! SQLite storage layer for the local identity

mod identity;
mod migrations;
mod parse;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;
use crate::models::Identity;

pub use identity::IdentityStore;
pub use traits::IdentityRepository;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        migrations::upgrade(&self.conn)?;
        Ok(())
    }

    pub fn schema_version(&self) -> u32 {
        migrations::current_version(&self.conn).unwrap_or(0)
    }

    /// Get identity store
    pub fn identity(&self) -> IdentityStore<'_> {
        IdentityStore::new(&self.conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version())
            .finish()
    }
}

impl IdentityRepository for Database {
    fn load_identity(&self) -> Result<Option<Identity>> {
        self.identity().load()
    }

    fn save_identity(&self, identity: &Identity) -> Result<()> {
        self.identity().save(identity)
    }

    fn clear_identity(&self) -> Result<()> {
        self.identity().clear()
    }
}

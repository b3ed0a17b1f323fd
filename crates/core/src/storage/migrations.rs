//! Schema versioning
//!
//! Each step runs in its own transaction together with the row that
//! records it, so an interrupted upgrade leaves the previous version intact.

use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use super::parse::OptionalExt;
use crate::error::Result;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[Step {
    version: 1,
    name: "local identity",
    sql: "CREATE TABLE identity (
              slot INTEGER PRIMARY KEY CHECK (slot = 1),
              user_id TEXT NOT NULL,
              username TEXT NOT NULL,
              created_at TEXT NOT NULL
          );",
}];

const BOOKKEEPING: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
)";

/// Highest applied version, 0 for a fresh database
pub(crate) fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get::<_, Option<u32>>(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Bring the schema up to date, returning the resulting version
#[instrument(skip(conn))]
pub(crate) fn upgrade(conn: &Connection) -> Result<u32> {
    conn.execute(BOOKKEEPING, [])?;
    let start = current_version(conn)?;

    for step in STEPS.iter().filter(|s| s.version > start) {
        debug!(version = step.version, name = step.name, "Applying schema step");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![step.version, step.name, chrono::Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
    }

    let end = current_version(conn)?;
    if end != start {
        info!(from = start, to = end, "Schema upgraded");
    }
    Ok(end)
}

//! SQLite bootstrap for the key-value table.
//!
//! # Responsibility
//! - Open file or in-memory connections backing `SqliteKeyValueStore`.
//! - Create the `kv_store` table on first open.
//!
//! # Invariants
//! - `PRAGMA user_version` equals [`KV_SCHEMA_VERSION`] on every returned
//!   connection.
//! - A database stamped with a newer version is refused, never rewritten.
//! - Every open attempt emits exactly one terminal `db_open` event.

use crate::repo::kv_store::{RepoError, RepoResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout version of the `kv_store` table.
pub const KV_SCHEMA_VERSION: u32 = 1;

const KV_STORE_SQL: &str = include_str!("kv_store.sql");

/// Opens (or creates) a database file with the `kv_store` table ready.
///
/// # Side effects
/// - Creates the database file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> RepoResult<Connection> {
    open_with_mode("file", || Connection::open(path))
}

/// Opens an in-memory database; data lives as long as the connection.
pub fn open_db_in_memory() -> RepoResult<Connection> {
    open_with_mode("memory", Connection::open_in_memory)
}

fn open_with_mode(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> RepoResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = open()
        .map_err(RepoError::from)
        .and_then(|mut conn| ensure_kv_schema(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={} schema_version={}",
            mode,
            started_at.elapsed().as_millis(),
            KV_SCHEMA_VERSION
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn ensure_kv_schema(conn: &mut Connection) -> RepoResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > KV_SCHEMA_VERSION {
        return Err(RepoError::UnsupportedSchemaVersion {
            found,
            supported: KV_SCHEMA_VERSION,
        });
    }
    if found == KV_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_STORE_SQL)?;
    tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

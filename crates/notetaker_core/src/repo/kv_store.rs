//! Flat key-value byte store contracts and implementations.
//!
//! # Responsibility
//! - Provide durable `key -> bytes` storage with full-overwrite writes.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Keys are non-empty.
//! - `put` replaces any previous value for the key in one statement.
//! - Values are opaque; this layer never inspects or transforms them.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for key-value storage and its SQLite bootstrap.
#[derive(Debug)]
pub enum RepoError {
    InvalidKey(String),
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "kv_store schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidKey(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Durable byte store addressed by string keys.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;
    /// Writes `value` under `key`, overwriting any previous value.
    fn put(&mut self, key: &str, value: &[u8]) -> RepoResult<()>;
    /// Removes `key`. Returns whether a value existed.
    fn remove(&mut self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed key-value store over the `kv_store` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - Returns `RepoError::Sqlite` when the `kv_store` table is missing, i.e.
    ///   the connection did not come from `db::open_db`.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        conn.query_row("SELECT COUNT(*) FROM kv_store;", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(Self { conn })
    }

    /// Returns the underlying connection.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        ensure_valid_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        ensure_valid_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        ensure_valid_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// Process-local key-value store.
///
/// Useful for embedding hosts that supply their own durable layer, and for
/// tests that simulate restarts without touching disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        ensure_valid_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        ensure_valid_key(key)?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        ensure_valid_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }
}

fn ensure_valid_key(key: &str) -> RepoResult<()> {
    if key.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(())
}

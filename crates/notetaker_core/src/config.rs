//! Core bootstrap configuration.
//!
//! # Responsibility
//! - Describe where notes are stored and how logging is set up.
//! - Open a ready-to-use note store from that description.
//!
//! # Invariants
//! - Configuration is an explicit value; nothing is read from the environment.
//! - Paths must be absolute.

use crate::db::{open_db, open_db_in_memory};
use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use crate::repo::kv_store::{RepoError, SqliteKeyValueStore};
use crate::service::note_store::NoteStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default database file name for hosts that only provide a data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "notetaker.sqlite3";

/// Bootstrap failure for [`open_note_store`].
#[derive(Debug)]
pub enum ConfigError {
    RelativePath { field: &'static str, path: PathBuf },
    Logging(LoggingError),
    Repo(RepoError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativePath { field, path } => {
                write!(f, "{field} must be an absolute path, got `{}`", path.display())
            }
            Self::Logging(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RelativePath { .. } => None,
            Self::Logging(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<RepoError> for ConfigError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Settings for opening the note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Database file. `None` keeps notes in memory for the process lifetime.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Config storing notes in `data_dir/notetaker.sqlite3`.
    pub fn in_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            db_path: Some(data_dir.as_ref().join(DEFAULT_DB_FILE_NAME)),
            ..Self::default()
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Checks paths and log level without touching the file system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level)?;
        ensure_absolute("db_path", self.db_path.as_deref())?;
        ensure_absolute("log_dir", self.log_dir.as_deref())?;
        Ok(())
    }
}

/// Opens the database described by `config` and hydrates a note store.
///
/// Logging is initialized first when `log_dir` is set, so that `db_open`
/// and load events are captured.
pub fn open_note_store(
    config: &CoreConfig,
) -> Result<NoteStore<SqliteKeyValueStore>, ConfigError> {
    config.validate()?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = SqliteKeyValueStore::try_new(conn)?;
    Ok(NoteStore::open(store))
}

fn ensure_absolute(field: &'static str, path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) if !path.is_absolute() => Err(ConfigError::RelativePath {
            field,
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

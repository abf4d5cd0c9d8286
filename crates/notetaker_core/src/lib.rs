//! Core domain logic for the notetaker app.
//! This crate owns the note list and its on-device persistence; presentation
//! layers render `NoteStore::notes()` and forward intents to it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{open_note_store, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::draft::NoteDraft;
pub use model::note::{
    validate_note_input, Note, NoteId, NoteValidationError, DEFAULT_NOTE_CONTENT,
    DEFAULT_NOTE_TITLE,
};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use repo::note_persistence::{
    NotePersistence, PersistError, PersistResult, NOTES_STORAGE_KEY,
};
pub use service::note_store::{EditOutcome, NoteStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

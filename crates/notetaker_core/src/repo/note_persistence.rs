//! Note collection persistence over a key-value store.
//!
//! # Responsibility
//! - Encode the full note collection as JSON under the `notes` key.
//! - Decode it back with order and ids preserved exactly.
//! - Apply the empty-on-failure policy for startup loads and best-effort
//!   saves.
//!
//! # Invariants
//! - Every save is a full overwrite; there is no partial write path.
//! - Stored value is a JSON array of `{ "id", "title", "content" }` records.
//! - Lenient entry points (`load`, `save`) never return errors; failures are
//!   logged as warnings without note text.

use crate::model::note::Note;
use crate::repo::kv_store::{KeyValueStore, RepoError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage key holding the encoded collection.
pub const NOTES_STORAGE_KEY: &str = "notes";

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure while moving the collection to or from storage.
#[derive(Debug)]
pub enum PersistError {
    Storage(RepoError),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::Decode(err) => write!(f, "failed to decode notes: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Persistence adapter binding the note collection to one storage key.
pub struct NotePersistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NotePersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the stored collection, treating any failure as "no data".
    pub fn load(&self) -> Vec<Note> {
        match self.try_load() {
            Ok(Some(notes)) => {
                debug!(
                    "event=notes_load module=persistence status=ok count={}",
                    notes.len()
                );
                notes
            }
            Ok(None) => {
                debug!("event=notes_load module=persistence status=ok count=0 source=absent");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=persistence status=error error_code={} error={}",
                    error_code(&err),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Saves the collection, dropping failures after logging them.
    ///
    /// Returns whether the write reached storage.
    pub fn save(&mut self, notes: &[Note]) -> bool {
        match self.try_save(notes) {
            Ok(()) => {
                debug!(
                    "event=notes_save module=persistence status=ok count={}",
                    notes.len()
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=notes_save module=persistence status=error error_code={} error={}",
                    error_code(&err),
                    err
                );
                false
            }
        }
    }

    /// Reads and decodes the stored collection.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    pub fn try_load(&self) -> PersistResult<Option<Vec<Note>>> {
        let Some(bytes) = self.store.get(NOTES_STORAGE_KEY)? else {
            return Ok(None);
        };
        decode_notes(&bytes).map(Some)
    }

    /// Encodes and writes the full collection under [`NOTES_STORAGE_KEY`].
    pub fn try_save(&mut self, notes: &[Note]) -> PersistResult<()> {
        let bytes = encode_notes(notes)?;
        self.store.put(NOTES_STORAGE_KEY, &bytes)?;
        Ok(())
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Encodes a collection into the stored JSON shape.
pub fn encode_notes(notes: &[Note]) -> PersistResult<Vec<u8>> {
    serde_json::to_vec(notes).map_err(PersistError::Encode)
}

/// Decodes the stored JSON shape into a collection.
pub fn decode_notes(bytes: &[u8]) -> PersistResult<Vec<Note>> {
    serde_json::from_slice(bytes).map_err(PersistError::Decode)
}

fn error_code(err: &PersistError) -> &'static str {
    match err {
        PersistError::Storage(_) => "storage_failed",
        PersistError::Encode(_) => "encode_failed",
        PersistError::Decode(_) => "decode_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, PersistError};
    use crate::model::note::Note;
    use uuid::Uuid;

    #[test]
    fn encode_emits_stable_field_order() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        let bytes = encode_notes(&[Note::with_id(id, "t", "c")]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"[{"id":"11111111-2222-4333-8444-555555555555","title":"t","content":"c"}]"#
        );
    }

    #[test]
    fn decode_rejects_non_uuid_ids() {
        let err = decode_notes(br#"[{"id":"7","title":"t","content":"c"}]"#).unwrap_err();
        assert!(matches!(err, PersistError::Decode(_)));
    }
}

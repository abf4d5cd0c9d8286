//! Note list state and mutation entry points.
//!
//! # Responsibility
//! - Own the ordered note collection for the process lifetime.
//! - Apply add/edit/delete intents and persist after each successful one.
//! - Hand out drafts for the select-then-save editing flow.
//!
//! # Invariants
//! - Note ids are unique within the collection.
//! - Insertion order is display order; a saved edit moves the note to the
//!   front.
//! - `edit` never changes the collection length, so it never moves the store
//!   between empty and non-empty.
//! - Storage holds exactly the collection as of the last successful mutation,
//!   unless that write itself failed (logged, never surfaced).
//! - A note failing validation is never committed.
//! - Duplicate ids found at startup are dropped and the cleaned list is
//!   written back once, before any intent runs.

use crate::model::draft::NoteDraft;
use crate::model::note::{validate_note_input, Note, NoteId, NoteValidationError};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::note_persistence::NotePersistence;
use log::{info, warn};
use std::collections::{BTreeSet, HashSet};

/// How a valid edit landed in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The note was found, removed, and reinserted at the front.
    Replaced,
    /// No note had the id, so the note at position 0 was replaced by the
    /// edit. Length is unchanged.
    ReplacedFront,
    /// No note had the id and the list was empty; nothing changed and
    /// nothing was persisted.
    Discarded,
}

/// Single source of truth for the note list.
pub struct NoteStore<S: KeyValueStore> {
    notes: Vec<Note>,
    persistence: NotePersistence<S>,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Hydrates a store from persisted state.
    ///
    /// Missing or undecodable data yields an empty list. Never fails.
    pub fn initialize(persistence: NotePersistence<S>) -> Self {
        let loaded = persistence.load();
        let loaded_len = loaded.len();
        let notes = dedupe_by_id(loaded);
        info!(
            "event=store_init module=store status=ok count={}",
            notes.len()
        );

        let mut store = Self { notes, persistence };
        if store.notes.len() != loaded_len {
            store.persist();
        }
        store
    }

    /// Shorthand for [`NoteStore::initialize`] over a raw key-value store.
    pub fn open(store: S) -> Self {
        Self::initialize(NotePersistence::new(store))
    }

    /// Current collection in display order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn position_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    /// Appends a placeholder note and persists.
    pub fn add(&mut self) -> &Note {
        self.notes.push(Note::placeholder());
        info!(
            "event=note_add module=store status=ok count={}",
            self.notes.len()
        );
        self.persist();
        &self.notes[self.notes.len() - 1]
    }

    /// Replaces the note with `id` and moves it to the front.
    ///
    /// When `id` is unknown the front note is replaced instead, see
    /// [`EditOutcome::ReplacedFront`]; on an empty list the edit is
    /// [`EditOutcome::Discarded`].
    ///
    /// # Errors
    /// - Returns `NoteValidationError` when `title` or `content` is empty; the
    ///   collection and storage are left untouched.
    pub fn edit(
        &mut self,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<EditOutcome, NoteValidationError> {
        let title = title.into();
        let content = content.into();
        if let Err(err) = validate_note_input(&title, &content) {
            info!("event=note_edit module=store status=rejected reason={err} note_id={id}");
            return Err(err);
        }

        let outcome = match self.position_of(id) {
            Some(position) => {
                self.notes.remove(position);
                EditOutcome::Replaced
            }
            None if self.notes.is_empty() => {
                warn!("event=note_edit module=store status=discarded note_id={id}");
                return Ok(EditOutcome::Discarded);
            }
            None => {
                warn!("event=note_edit module=store status=ok fallback=replace_front note_id={id}");
                self.notes.remove(0);
                EditOutcome::ReplacedFront
            }
        };
        self.notes.insert(0, Note::with_id(id, title, content));
        info!("event=note_edit module=store status=ok note_id={id}");
        self.persist();
        Ok(outcome)
    }

    /// Removes notes at the given positions and persists.
    ///
    /// Positions refer to the ordering before any removal. Duplicates and
    /// out-of-range positions are ignored. Returns the number removed; storage
    /// is only written when at least one note was removed.
    pub fn delete_at(&mut self, positions: impl IntoIterator<Item = usize>) -> usize {
        let positions: BTreeSet<usize> = positions.into_iter().collect();
        let before = self.notes.len();
        let mut index = 0;
        self.notes.retain(|_| {
            let keep = !positions.contains(&index);
            index += 1;
            keep
        });

        let removed = before - self.notes.len();
        if removed > 0 {
            info!(
                "event=note_delete module=store status=ok removed={} count={}",
                removed,
                self.notes.len()
            );
            self.persist();
        }
        removed
    }

    /// Selects the note at `position` for editing.
    pub fn select(&self, position: usize) -> Option<NoteDraft> {
        self.notes.get(position).map(NoteDraft::from)
    }

    /// Saves a draft back through [`NoteStore::edit`].
    pub fn commit(&mut self, draft: &NoteDraft) -> Result<EditOutcome, NoteValidationError> {
        self.edit(draft.id(), draft.title.as_str(), draft.content.as_str())
    }

    /// Consumes the store and returns its persistence adapter.
    pub fn into_persistence(self) -> NotePersistence<S> {
        self.persistence
    }

    fn persist(&mut self) {
        self.persistence.save(&self.notes);
    }
}

fn dedupe_by_id(notes: Vec<Note>) -> Vec<Note> {
    let total = notes.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Note> = notes
        .into_iter()
        .filter(|note| seen.insert(note.id))
        .collect();
    if unique.len() != total {
        warn!(
            "event=store_init module=store status=ok dropped_duplicates={}",
            total - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::dedupe_by_id;
    use crate::model::note::Note;

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let first = Note::new("a", "1");
        let dup = Note::with_id(first.id, "b", "2");
        let other = Note::new("c", "3");

        let notes = dedupe_by_id(vec![first.clone(), dup, other.clone()]);
        assert_eq!(notes, vec![first, other]);
    }
}

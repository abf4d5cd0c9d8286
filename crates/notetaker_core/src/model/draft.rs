//! Editable copy of a selected note.
//!
//! The list screen hands a draft to the detail screen; the detail screen
//! mutates it freely and confirms it back through `NoteStore::commit`.

use crate::model::note::{validate_note_input, Note, NoteId, NoteValidationError};

/// Working copy of one note keyed by the original note id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    id: NoteId,
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Id of the note this draft was selected from.
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Returns whether the draft can currently be saved.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_note_input(&self.title, &self.content)
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

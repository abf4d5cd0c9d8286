//! Note domain model.
//!
//! # Responsibility
//! - Define the single record shown in the note list.
//! - Own the save-time validation rule for title/content.
//!
//! # Invariants
//! - `id` is generated once and never changes for the note lifetime.
//! - Validation is an exact emptiness check; whitespace is not trimmed.
//! - Wire shape is exactly `{ "id", "title", "content" }` in that order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title assigned to notes created by the add intent.
pub const DEFAULT_NOTE_TITLE: &str = "New Note";
/// Content assigned to notes created by the add intent.
pub const DEFAULT_NOTE_CONTENT: &str = "I'm an avocado!";

/// Stable identifier for a note.
///
/// Used only for identity and lookup; never ordering-significant.
pub type NoteId = Uuid;

/// Reasons a candidate note cannot be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// One entry of the note list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

impl Note {
    /// Creates a note with a freshly generated id.
    ///
    /// Does not validate; callers on the save path use [`validate_note_input`].
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, content)
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used when an edit replaces an existing note wholesale, and by decode
    /// paths where identity already exists.
    pub fn with_id(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Creates the placeholder note produced by the add intent.
    pub fn placeholder() -> Self {
        Self::new(DEFAULT_NOTE_TITLE, DEFAULT_NOTE_CONTENT)
    }

    /// Checks whether this note may be committed.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_note_input(&self.title, &self.content)
    }
}

/// Validates a title/content pair for the edit-save path.
///
/// Title is checked first, so a pair with both fields empty reports
/// `EmptyTitle`.
pub fn validate_note_input(title: &str, content: &str) -> Result<(), NoteValidationError> {
    if title.is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_note_input, Note, NoteValidationError};

    #[test]
    fn whitespace_only_fields_are_valid() {
        assert_eq!(validate_note_input(" ", "\n"), Ok(()));
    }

    #[test]
    fn title_is_checked_before_content() {
        assert_eq!(validate_note_input("", ""), Err(NoteValidationError::EmptyTitle));
        assert_eq!(validate_note_input("t", ""), Err(NoteValidationError::EmptyContent));
    }

    #[test]
    fn placeholder_passes_validation() {
        assert!(Note::placeholder().validate().is_ok());
    }
}

//! Domain model for the note list.
//!
//! # Responsibility
//! - Define the note record and its validation rule.
//! - Define the draft shape used by the select/edit/save flow.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod draft;
pub mod note;

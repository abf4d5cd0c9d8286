//! Core use-case services.
//!
//! # Responsibility
//! - Turn presentation intents into collection mutations.
//! - Keep the presentation layer decoupled from storage details.

pub mod note_store;

//! Persistence layer: byte store contracts and note collection encoding.
//!
//! # Responsibility
//! - Define the durable key-value contract the core writes through.
//! - Isolate SQLite and JSON details from the note store.
//!
//! # Invariants
//! - The note collection is always written whole under one key.

pub mod kv_store;
pub mod note_persistence;

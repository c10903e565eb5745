//! Domain records for the assistant's collections.
//!
//! # Responsibility
//! - Define the persisted shapes of todos, events, notes, settings and
//!   command history.
//! - Keep JSON field names camelCase so stored documents and backups stay
//!   compatible across versions.
//!
//! # Invariants
//! - Collections are independent: no record references another.
//! - Every record is identified by a generated `RecordId`.

pub mod command;
pub mod event;
pub mod id;
pub mod note;
pub mod settings;
pub mod todo;

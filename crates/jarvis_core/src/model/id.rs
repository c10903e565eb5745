//! Record identifier generation.
//!
//! # Invariants
//! - Generated IDs are unique for the lifetime of a generator.
//! - IDs are opaque strings so records imported from older backups (which
//!   used millisecond timestamps) keep their identity.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Identifier shared by todos, events, notes and history entries.
pub type RecordId = String;

/// Source of fresh record identifiers.
pub trait IdGenerator {
    fn next_id(&self) -> RecordId;
}

/// Random v4 UUIDs; the production generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> RecordId {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic counter producing `1`, `2`, `3`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RecordId {
        (self.last.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

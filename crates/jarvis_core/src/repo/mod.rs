//! Persistence layer: key/value stores and typed collections.
//!
//! # Responsibility
//! - Define the injected storage contract (`KeyValueStore`).
//! - Map each collection to a fixed key holding one JSON document.
//! - Notify observers of storage changes.
//!
//! # Invariants
//! - Business logic reaches storage only through `StorageService`.

pub mod change_feed;
pub mod collection_repo;
pub mod kv_repo;

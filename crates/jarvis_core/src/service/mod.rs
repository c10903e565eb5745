//! Collection use-case services.
//!
//! # Responsibility
//! - Orchestrate collection reads/writes into use-case level APIs.
//! - Keep CLI callers decoupled from storage keys and JSON layout.
//!
//! # Invariants
//! - Services reach storage only through the injected `StorageService`.

use crate::clock::Clock;
use crate::model::id::IdGenerator;
use crate::repo::collection_repo::StorageService;
use crate::repo::kv_repo::KeyValueStore;

pub mod backup_service;
pub mod calendar_service;
pub mod error;
pub mod note_service;
pub mod todo_service;

/// Dependencies shared by every service.
pub struct ServiceContext<'a, S: KeyValueStore> {
    pub storage: &'a StorageService<S>,
    pub clock: &'a dyn Clock,
    pub ids: &'a dyn IdGenerator,
}

impl<S: KeyValueStore> Clone for ServiceContext<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: KeyValueStore> Copy for ServiceContext<'_, S> {}

//! Typed collection storage on top of a `KeyValueStore`.
//!
//! # Responsibility
//! - Load and save each collection as one JSON document under a fixed key.
//! - Publish a `StorageChange` after every successful mutation.
//!
//! # Invariants
//! - Reads never fail: absent, unreadable or corrupt values yield the empty
//!   collection (or default settings) and a `warn` event.
//! - Writes replace the full collection; there are no incremental updates.

use crate::model::command::CommandRecord;
use crate::model::event::CalendarEvent;
use crate::model::note::Note;
use crate::model::settings::Settings;
use crate::model::todo::Todo;
use crate::repo::change_feed::{ChangeFeed, StorageChange};
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const TODOS_KEY: &str = "jarvis_todos";
pub const NOTES_KEY: &str = "jarvis_notes";
pub const EVENTS_KEY: &str = "jarvis_events";
pub const COMMANDS_KEY: &str = "jarvis_commands";
pub const SETTINGS_KEY: &str = "jarvis_settings";

/// Every key owned by the assistant, in export order.
pub const ALL_KEYS: [&str; 5] = [TODOS_KEY, NOTES_KEY, EVENTS_KEY, COMMANDS_KEY, SETTINGS_KEY];

/// Collection-level storage service injected into business logic.
pub struct StorageService<S: KeyValueStore> {
    store: S,
    feed: ChangeFeed,
}

impl<S: KeyValueStore> StorageService<S> {
    /// Creates a service with its own, unshared change feed.
    pub fn new(store: S) -> Self {
        Self::with_feed(store, ChangeFeed::new())
    }

    /// Creates a service that publishes into an existing feed.
    pub fn with_feed(store: S, feed: ChangeFeed) -> Self {
        Self { store, feed }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.load_or_default(TODOS_KEY)
    }

    pub fn save_todos(&self, todos: &[Todo]) -> RepoResult<()> {
        self.save(TODOS_KEY, todos)
    }

    pub fn notes(&self) -> Vec<Note> {
        self.load_or_default(NOTES_KEY)
    }

    pub fn save_notes(&self, notes: &[Note]) -> RepoResult<()> {
        self.save(NOTES_KEY, notes)
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.load_or_default(EVENTS_KEY)
    }

    pub fn save_events(&self, events: &[CalendarEvent]) -> RepoResult<()> {
        self.save(EVENTS_KEY, events)
    }

    /// Command history, newest first.
    pub fn commands(&self) -> Vec<CommandRecord> {
        self.load_or_default(COMMANDS_KEY)
    }

    pub fn save_commands(&self, commands: &[CommandRecord]) -> RepoResult<()> {
        self.save(COMMANDS_KEY, commands)
    }

    pub fn settings(&self) -> Settings {
        self.load_or_default(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) -> RepoResult<()> {
        self.save(SETTINGS_KEY, settings)
    }

    /// Removes every stored key, including ones this crate does not own.
    pub fn clear_all(&self) -> RepoResult<()> {
        self.store.clear()?;
        self.feed.publish(&StorageChange::cleared());
        Ok(())
    }

    /// Removes one key; returns whether it existed.
    pub fn remove(&self, key: &str) -> RepoResult<bool> {
        let existed = self.store.remove(key)?;
        if existed {
            self.feed.publish(&StorageChange::removed(key));
        }
        Ok(existed)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &'static str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!("event=storage_read module=repo status=error key={key} error={err}");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=storage_read module=repo status=corrupt key={key} line={} column={}",
                    err.line(),
                    err.column()
                );
                T::default()
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> RepoResult<()> {
        let raw =
            serde_json::to_string(value).map_err(|source| RepoError::Serialize { key, source })?;
        self.store.set(key, &raw)?;
        self.feed.publish(&StorageChange::set(key));
        Ok(())
    }
}

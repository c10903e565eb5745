//! Facade wiring storage, clock and ID generation into the services.

use crate::clock::{Clock, SystemClock};
use crate::command::classifier::classify_at;
use crate::command::executor::CommandExecutor;
use crate::command::session::CommandSession;
use crate::model::id::{IdGenerator, UuidGenerator};
use crate::repo::collection_repo::StorageService;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::backup_service::BackupService;
use crate::service::calendar_service::CalendarService;
use crate::service::note_service::NoteService;
use crate::service::todo_service::TodoService;
use crate::service::ServiceContext;
use std::time::Duration;

/// Owns the injected dependencies and hands out borrowed services.
pub struct Assistant<S: KeyValueStore> {
    storage: StorageService<S>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl<S: KeyValueStore> Assistant<S> {
    /// Production wiring: wall clock and UUID identifiers.
    pub fn new(store: S) -> Self {
        Self::with_parts(
            StorageService::new(store),
            Box::new(SystemClock),
            Box::new(UuidGenerator),
        )
    }

    pub fn with_parts(
        storage: StorageService<S>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            storage,
            clock,
            ids,
        }
    }

    pub fn storage(&self) -> &StorageService<S> {
        &self.storage
    }

    pub fn context(&self) -> ServiceContext<'_, S> {
        ServiceContext {
            storage: &self.storage,
            clock: self.clock.as_ref(),
            ids: self.ids.as_ref(),
        }
    }

    pub fn todos(&self) -> TodoService<'_, S> {
        TodoService::new(self.context())
    }

    pub fn calendar(&self) -> CalendarService<'_, S> {
        CalendarService::new(self.context())
    }

    pub fn notes(&self) -> NoteService<'_, S> {
        NoteService::new(self.context())
    }

    pub fn backup(&self) -> BackupService<'_, S> {
        BackupService::new(self.context())
    }

    pub fn executor(&self) -> CommandExecutor<'_, S> {
        CommandExecutor::new(&self.storage, self.clock.as_ref(), self.ids.as_ref())
    }

    /// Starts a command session; calendar defaults follow the clock.
    pub fn session(&self, think_delay: Duration) -> CommandSession<'_, S> {
        CommandSession::new(self.executor(), think_delay)
    }

    /// Classifies and executes `text` without any delay.
    pub fn ask(&self, text: &str) -> String {
        let command = classify_at(text, self.clock.today());
        self.executor().execute(&command)
    }
}

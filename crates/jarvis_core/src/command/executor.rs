//! Intent executor: turns a classified command into stored records.
//!
//! # Invariants
//! - `execute` appends at most one record to the collection implied by
//!   the intent and always prepends exactly one history entry.
//! - History holds at most `HISTORY_LIMIT` entries, newest first.
//! - `execute` never fails: storage errors are logged and the
//!   classifier's message is still returned.

use crate::clock::Clock;
use crate::model::command::{CommandRecord, ExtractedData, IntentType, ParsedCommand};
use crate::model::event::CalendarEvent;
use crate::model::id::IdGenerator;
use crate::model::note::Note;
use crate::model::todo::Todo;
use crate::repo::collection_repo::StorageService;
use crate::repo::kv_repo::{KeyValueStore, RepoResult};
use log::{error, info};

/// Maximum number of history entries retained.
pub const HISTORY_LIMIT: usize = 50;

/// Applies parsed commands against injected storage.
pub struct CommandExecutor<'a, S: KeyValueStore> {
    storage: &'a StorageService<S>,
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
}

impl<'a, S: KeyValueStore> CommandExecutor<'a, S> {
    pub fn new(
        storage: &'a StorageService<S>,
        clock: &'a dyn Clock,
        ids: &'a dyn IdGenerator,
    ) -> Self {
        Self {
            storage,
            clock,
            ids,
        }
    }

    /// Persists the command's record and history entry; returns its message.
    pub fn execute(&self, command: &ParsedCommand) -> String {
        let intent = command.intent_type.as_str();
        let action = command.action.as_str();

        let stages = [
            ("record", self.append_record(command)),
            ("history", self.append_history(command)),
        ];
        let mut failed = false;
        for (stage, result) in stages {
            if let Err(err) = result {
                failed = true;
                error!(
                    "event=command_execute module=command status=error stage={stage} intent={intent} action={action} error={err}"
                );
            }
        }

        if !failed {
            info!("event=command_execute module=command status=ok intent={intent} action={action}");
        }
        command.message.clone()
    }

    /// Current date from the injected clock.
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    /// History entries, newest first.
    pub fn history(&self) -> Vec<CommandRecord> {
        self.storage.commands()
    }

    fn append_record(&self, command: &ParsedCommand) -> RepoResult<()> {
        let now = self.clock.now();
        match (&command.intent_type, &command.data) {
            (IntentType::Todo, ExtractedData::Todo { text }) => {
                let mut todos = self.storage.todos();
                todos.push(Todo::new(self.ids.next_id(), text.as_str(), now));
                self.storage.save_todos(&todos)
            }
            (
                IntentType::Calendar,
                ExtractedData::Calendar {
                    title, date, time, ..
                },
            ) => {
                let mut events = self.storage.events();
                let mut event = CalendarEvent::new(self.ids.next_id(), title.as_str(), *date);
                event.time = time.clone();
                events.push(event);
                self.storage.save_events(&events)
            }
            (IntentType::Note, ExtractedData::Note { title, content }) => {
                let mut notes = self.storage.notes();
                notes.push(Note::new(
                    self.ids.next_id(),
                    title.as_str(),
                    content.as_str(),
                    now,
                ));
                self.storage.save_notes(&notes)
            }
            _ => Ok(()),
        }
    }

    fn append_history(&self, command: &ParsedCommand) -> RepoResult<()> {
        let mut history = self.storage.commands();
        history.insert(
            0,
            CommandRecord::from_parsed(self.ids.next_id(), command, self.clock.now()),
        );
        history.truncate(HISTORY_LIMIT);
        self.storage.save_commands(&history)
    }
}

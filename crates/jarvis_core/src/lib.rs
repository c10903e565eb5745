//! Core logic for the Jarvis personal assistant.
//!
//! Free-text commands are classified into todo/calendar/note intents and
//! executed against collections persisted in an injected key/value store.

mod assistant;
pub mod clock;
pub mod command;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use assistant::Assistant;
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::classifier::{classify, classify_at, rule_names};
pub use command::executor::{CommandExecutor, HISTORY_LIMIT};
pub use command::session::{CommandSession, CommandTicket, SessionError, DEFAULT_THINK_DELAY};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::command::{
    CommandAction, CommandRecord, ExtractedData, IntentType, ParsedCommand,
};
pub use model::event::CalendarEvent;
pub use model::id::{IdGenerator, RecordId, SequentialIdGenerator, UuidGenerator};
pub use model::note::Note;
pub use model::settings::{Layout, Settings, Theme};
pub use model::todo::{Priority, Todo};
pub use repo::change_feed::{ChangeFeed, ChangeKind, StorageChange, SubscriptionId};
pub use repo::collection_repo::StorageService;
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use service::backup_service::{BackupDocument, BackupError, ImportReport, StorageSummary};
pub use service::calendar_service::NewEvent;
pub use service::error::{ServiceError, ServiceResult};
pub use service::note_service::NoteEdit;
pub use service::todo_service::{TodoCounts, TodoFilter};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

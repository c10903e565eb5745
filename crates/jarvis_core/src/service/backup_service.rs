//! Export, import and wipe of all stored collections.
//!
//! # Responsibility
//! - Serialize todos, notes, events and settings into one backup document.
//! - Apply a backup document, overwriting only the sections it contains.
//!
//! # Invariants
//! - Import parses the whole document before writing anything; a malformed
//!   document changes nothing.
//! - Command history is neither exported nor overwritten by import.
//! - Export followed by import reproduces the exported collections.

use crate::model::event::CalendarEvent;
use crate::model::note::Note;
use crate::model::settings::Settings;
use crate::model::todo::Todo;
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult};
use crate::service::ServiceContext;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BACKUP_FILE_PREFIX: &str = "jarvis-backup";

/// Full backup as written by `export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub todos: Vec<Todo>,
    pub notes: Vec<Note>,
    pub events: Vec<CalendarEvent>,
    pub settings: Settings,
    pub export_date: DateTime<Utc>,
}

/// Import shape: every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    #[serde(default)]
    todos: Option<Vec<Todo>>,
    #[serde(default)]
    notes: Option<Vec<Note>>,
    #[serde(default)]
    events: Option<Vec<CalendarEvent>>,
    #[serde(default)]
    settings: Option<Settings>,
}

/// Which sections an import overwrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub todos: bool,
    pub notes: bool,
    pub events: bool,
    pub settings: bool,
}

impl ImportReport {
    pub fn applied_any(&self) -> bool {
        self.todos || self.notes || self.events || self.settings
    }
}

/// Record counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSummary {
    pub todos: usize,
    pub notes: usize,
    pub events: usize,
}

#[derive(Debug)]
pub enum BackupError {
    /// The document is not valid JSON or does not match the backup shape.
    Malformed(serde_json::Error),
    Repo(RepoError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed backup document: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct BackupService<'a, S: KeyValueStore> {
    ctx: ServiceContext<'a, S>,
}

impl<'a, S: KeyValueStore> BackupService<'a, S> {
    pub fn new(ctx: ServiceContext<'a, S>) -> Self {
        Self { ctx }
    }

    pub fn export(&self) -> BackupDocument {
        let storage = self.ctx.storage;
        BackupDocument {
            todos: storage.todos(),
            notes: storage.notes(),
            events: storage.events(),
            settings: storage.settings(),
            export_date: self.ctx.clock.now(),
        }
    }

    /// Pretty-printed JSON of `export()`.
    pub fn export_json(&self) -> RepoResult<String> {
        let document = self.export();
        let json = serde_json::to_string_pretty(&document).map_err(|source| {
            RepoError::Serialize {
                key: "backup",
                source,
            }
        })?;
        info!(
            "event=backup_export module=service status=ok todos={} notes={} events={}",
            document.todos.len(),
            document.notes.len(),
            document.events.len()
        );
        Ok(json)
    }

    /// `jarvis-backup-YYYY-MM-DD.json` for the current date.
    pub fn suggested_file_name(&self) -> String {
        format!(
            "{BACKUP_FILE_PREFIX}-{}.json",
            self.ctx.clock.today().format("%Y-%m-%d")
        )
    }

    /// Applies every section present in `json`.
    ///
    /// # Errors
    /// - `Malformed` when parsing fails; nothing is written.
    /// - `Repo` when a write fails; earlier sections stay applied.
    pub fn import_json(&self, json: &str) -> Result<ImportReport, BackupError> {
        let document: ImportDocument = serde_json::from_str(json).map_err(|err| {
            warn!(
                "event=backup_import module=service status=error error_code=malformed line={} column={}",
                err.line(),
                err.column()
            );
            BackupError::Malformed(err)
        })?;

        let storage = self.ctx.storage;
        let mut report = ImportReport::default();
        if let Some(todos) = document.todos {
            storage.save_todos(&todos)?;
            report.todos = true;
        }
        if let Some(notes) = document.notes {
            storage.save_notes(&notes)?;
            report.notes = true;
        }
        if let Some(events) = document.events {
            storage.save_events(&events)?;
            report.events = true;
        }
        if let Some(settings) = document.settings {
            storage.save_settings(&settings)?;
            report.settings = true;
        }

        info!(
            "event=backup_import module=service status=ok todos={} notes={} events={} settings={}",
            report.todos, report.notes, report.events, report.settings
        );
        Ok(report)
    }

    pub fn summary(&self) -> StorageSummary {
        let storage = self.ctx.storage;
        StorageSummary {
            todos: storage.todos().len(),
            notes: storage.notes().len(),
            events: storage.events().len(),
        }
    }

    /// Deletes every stored key, history and settings included.
    pub fn clear_all(&self) -> RepoResult<()> {
        self.ctx.storage.clear_all()?;
        info!("event=storage_clear module=service status=ok");
        Ok(())
    }
}

//! Classified commands and their history entries.
//!
//! # Invariants
//! - A `CommandRecord` is immutable once written to history.
//! - `ExtractedData` variant always agrees with `intent_type`:
//!   todo/calendar/note intents carry their payload, `unknown` carries none.

use super::id::RecordId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Classified purpose of a free-text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Todo,
    Calendar,
    Note,
    Unknown,
}

impl IntentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Calendar => "calendar",
            Self::Note => "note",
            Self::Unknown => "unknown",
        }
    }
}

/// What the command asks for within its intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Create,
    Chat,
    Delete,
    List,
    Unknown,
}

impl CommandAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Chat => "chat",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Unknown => "unknown",
        }
    }
}

/// Payload pulled out of the command text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedData {
    Todo {
        text: String,
    },
    Calendar {
        title: String,
        date: NaiveDate,
        /// Raw date fragment found in the title, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_fragment: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<String>,
    },
    Note {
        title: String,
        content: String,
    },
    Empty,
}

/// Classifier output, consumed by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub raw_text: String,
    pub intent_type: IntentType,
    pub action: CommandAction,
    pub data: ExtractedData,
    /// Human-readable confirmation returned to the caller.
    pub message: String,
}

impl ParsedCommand {
    /// Builds an `unknown` intent that carries no payload.
    pub fn unknown(
        raw_text: impl Into<String>,
        action: CommandAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            intent_type: IntentType::Unknown,
            action,
            data: ExtractedData::Empty,
            message: message.into(),
        }
    }
}

/// One executed command in the bounded history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub id: RecordId,
    pub raw_text: String,
    pub intent_type: IntentType,
    pub action: CommandAction,
    pub extracted_data: ExtractedData,
    pub result_message: String,
    pub executed_at: DateTime<Utc>,
}

impl CommandRecord {
    pub fn from_parsed(id: RecordId, command: &ParsedCommand, executed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            raw_text: command.raw_text.clone(),
            intent_type: command.intent_type,
            action: command.action,
            extracted_data: command.data.clone(),
            result_message: command.message.clone(),
            executed_at,
        }
    }
}

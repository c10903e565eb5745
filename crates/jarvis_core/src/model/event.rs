//! Calendar event model.

use super::id::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Color assigned to every newly created event.
pub const DEFAULT_EVENT_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Free-form time fragment such as `14:30` or `3시`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub color: String,
}

impl CalendarEvent {
    pub fn new(id: RecordId, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            date,
            time: None,
            color: DEFAULT_EVENT_COLOR.to_string(),
        }
    }
}

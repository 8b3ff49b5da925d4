//! Task data structure and timestamp helpers.
//!
//! The serialized field names are the ones used by existing `tarefas.json`
//! files, so lists written by earlier versions load unchanged.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Textual layout of `created_at`: day/month/year hour:minute, 24-hour clock.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "nome")]
    pub text: String,
    #[serde(rename = "concluida")]
    pub completed: bool,
    #[serde(rename = "data_criacao", default)]
    pub created_at: String,
}

impl Task {
    /// Create an open task stamped with the given creation time.
    pub fn new(text: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Task {
            text: text.into(),
            completed: false,
            created_at: format_timestamp(created_at),
        }
    }

    /// Create an open task stamped with the current local time.
    pub fn now(text: impl Into<String>) -> Self {
        Self::new(text, Local::now().naive_local())
    }
}

/// Format a creation time the way it is stored on disk.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored creation time. Returns `None` for empty or foreign strings.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

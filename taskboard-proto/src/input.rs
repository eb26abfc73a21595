//! Request body schema for create and update.
//!
//! [`TaskInput`] mirrors what a form submits: every field is an optional
//! string. [`TaskInput::validate`] runs once at the request boundary and
//! turns it into [`TaskFields`], so nothing downstream sees loose input.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, TaskFields, TaskStatus};

/// Errors produced while validating a [`TaskInput`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title was absent or blank.
    #[error("title is required")]
    MissingTitle,
    /// Status was absent or blank.
    #[error("status is required")]
    MissingStatus,
    /// Due date was absent or blank.
    #[error("dueDate is required")]
    MissingDueDate,
    /// Due date did not parse to a calendar date.
    #[error("dueDate is not a valid date: {0:?}")]
    InvalidDueDate(String),
    /// Priority named no known level.
    #[error("priority must be one of Low, Medium, High (got {0:?})")]
    InvalidPriority(String),
    /// Status named no known state.
    #[error("status must be one of Not Started, In Progress, Completed (got {0:?})")]
    InvalidStatus(String),
}

/// Loose task body as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInput {
    /// Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional; blank is treated as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required; `YYYY-MM-DD` or RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Defaults to `Low` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Raw comma-delimited tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TaskInput {
    /// Checks required fields and enum membership, producing typed fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking title, status,
    /// then due date, then enum values.
    pub fn validate(self) -> Result<TaskFields, ValidationError> {
        let title = non_blank(self.title).ok_or(ValidationError::MissingTitle)?;
        let status_raw = non_blank(self.status).ok_or(ValidationError::MissingStatus)?;
        let due_raw = non_blank(self.due_date).ok_or(ValidationError::MissingDueDate)?;

        let due_date =
            parse_due_date(&due_raw).ok_or_else(|| ValidationError::InvalidDueDate(due_raw))?;
        let priority = match non_blank(self.priority) {
            Some(raw) => raw
                .parse::<Priority>()
                .map_err(|e| ValidationError::InvalidPriority(e.value().to_string()))?,
            None => Priority::default(),
        };
        let status = status_raw
            .parse::<TaskStatus>()
            .map_err(|e| ValidationError::InvalidStatus(e.value().to_string()))?;

        Ok(TaskFields {
            title,
            description: non_blank(self.description),
            due_date: Some(due_date),
            priority,
            tags: self.tags.unwrap_or_default(),
            status,
        })
    }
}

impl From<&TaskFields> for TaskInput {
    fn from(fields: &TaskFields) -> Self {
        Self {
            title: Some(fields.title.clone()),
            description: fields.description.clone(),
            due_date: fields.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            priority: Some(fields.priority.to_string()),
            tags: Some(fields.tags.clone()),
            status: Some(fields.status.to_string()),
        }
    }
}

/// Parses a due date, discarding any time-of-day.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

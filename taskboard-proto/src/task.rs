//! The task record and its enumerations.
//!
//! A [`Task`] is the only persisted entity. Its mutable fields travel
//! together as [`TaskFields`]: updates are full replacements, so there is no
//! per-field patch type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tags::parse_tags;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Error returned when a string names no known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Task priority. Defaults to [`Priority::Low`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    #[default]
    Low,
    /// Normal urgency.
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// Progress state of a task. Defaults to [`TaskStatus::NotStarted`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Nothing done yet.
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Actively being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// The mutable part of a task, already validated.
///
/// Produced by [`crate::input::TaskInput::validate`] and consumed whole by
/// the store on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Non-empty title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Priority level.
    pub priority: Priority,
    /// Raw comma-delimited tag text.
    pub tags: String,
    /// Progress state.
    pub status: TaskStatus,
}

impl TaskFields {
    /// Fields with the given title and every other field at its default.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: Priority::default(),
            tags: String::new(),
            status: TaskStatus::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the raw tag text.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// A persisted task document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier, immutable.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Priority level.
    pub priority: Priority,
    /// Raw comma-delimited tag text, as submitted.
    pub tags: String,
    /// Progress state.
    pub status: TaskStatus,
    /// Set once when the document is created.
    pub created_at: DateTime<Utc>,
    /// Bumped on every write.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new document with a fresh id and both timestamps at `now`.
    #[must_use]
    pub fn create(fields: TaskFields, now: DateTime<Utc>) -> Self {
        let TaskFields {
            title,
            description,
            due_date,
            priority,
            tags,
            status,
        } = fields;
        Self {
            id: TaskId::new(),
            title,
            description,
            due_date,
            priority,
            tags,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field. `id` and `created_at` are untouched.
    pub fn replace_fields(&mut self, fields: TaskFields, now: DateTime<Utc>) {
        self.title = fields.title;
        self.description = fields.description;
        self.due_date = fields.due_date;
        self.priority = fields.priority;
        self.tags = fields.tags;
        self.status = fields.status;
        self.updated_at = now;
    }

    /// Copies out the mutable fields.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            priority: self.priority,
            tags: self.tags.clone(),
            status: self.status,
        }
    }

    /// Tags split out of the raw text.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }
}

//! Display shaping for the task list.
//!
//! Stored tasks carry raw tag text and ISO dates; the list shows exploded
//! tags, `d/m/yyyy` dates, and colored badges.

use chrono::{Datelike, NaiveDate};
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};

/// Badge color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Done or low stakes.
    Success,
    /// In flight or medium stakes.
    Attention,
    /// Not started or high stakes.
    Critical,
}

impl Tone {
    /// Badge for a status.
    #[must_use]
    pub const fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Completed => Self::Success,
            TaskStatus::InProgress => Self::Attention,
            TaskStatus::NotStarted => Self::Critical,
        }
    }

    /// Badge for a priority.
    #[must_use]
    pub const fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::Low => Self::Success,
            Priority::Medium => Self::Attention,
            Priority::High => Self::Critical,
        }
    }
}

/// One row of the task list, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Stored task id.
    pub id: TaskId,
    /// Title as stored.
    pub title: String,
    /// Description, empty when none.
    pub description: String,
    /// Due date as `d/m/yyyy`, empty when undated.
    pub due: String,
    /// Due on or before the reference day.
    pub expired: bool,
    /// Progress state.
    pub status: TaskStatus,
    /// Badge for [`TaskView::status`].
    pub status_tone: Tone,
    /// Urgency.
    pub priority: Priority,
    /// Badge for [`TaskView::priority`].
    pub priority_tone: Tone,
    /// Tags split out of the stored text, in order.
    pub tags: Vec<String>,
}

impl TaskView {
    /// Shapes a task as seen on `today`.
    #[must_use]
    pub fn from_task(task: &Task, today: NaiveDate) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due: task.due_date.map(local_date).unwrap_or_default(),
            expired: task.due_date.is_some_and(|due| due <= today),
            status: task.status,
            status_tone: Tone::for_status(task.status),
            priority: task.priority,
            priority_tone: Tone::for_priority(task.priority),
            tags: task.tag_list(),
        }
    }
}

/// Formats a date day-first without zero padding, e.g. `5/3/2024`.
#[must_use]
pub fn local_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Rows whose title or description contains `text`, ignoring case. Blank
/// text keeps every row.
#[must_use]
pub fn search_views<'a>(views: &'a [TaskView], text: &str) -> Vec<&'a TaskView> {
    let needle = text.trim().to_lowercase();
    views
        .iter()
        .filter(|view| {
            needle.is_empty()
                || view.title.to_lowercase().contains(&needle)
                || view.description.to_lowercase().contains(&needle)
        })
        .collect()
}

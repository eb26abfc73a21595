//! Search parameters accepted by the task list endpoint.
//!
//! Every parameter is optional. When `id` is present the others are ignored;
//! otherwise the present parameters combine conjunctively. A blank
//! parameter (`?status=`) reads as absent.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::task::{Priority, TaskId, TaskStatus};

/// Sparse bundle of optional task search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskQuery {
    /// Exact id lookup. Kept as text so malformed ids simply match nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Case-insensitive title substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Exact status.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub status: Option<TaskStatus>,
    /// Exact priority.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub priority: Option<Priority>,
    /// Inclusive lower bound on the due date.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on the due date.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub to_date: Option<NaiveDate>,
    /// Whole-word, case-insensitive match against the raw tag text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl TaskQuery {
    /// A query that returns every task.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A query for a single id.
    #[must_use]
    pub fn by_id(id: &TaskId) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// Adds a title substring.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds an exact status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Adds an exact priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Adds due date bounds; either may be `None`.
    #[must_use]
    pub const fn with_due_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from_date = from;
        self.to_date = to;
        self
    }

    /// Adds a tag word.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// True when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Reads an optional parameter through [`FromStr`], treating blank text as
/// absent. Unparseable text is a deserialization error naming the value.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(TaskQuery::all().is_empty());
        assert!(!TaskQuery::all().with_tag("x").is_empty());
    }

    #[test]
    fn json_omits_absent_parameters() {
        let query = TaskQuery::all()
            .with_status(TaskStatus::Completed)
            .with_due_range(NaiveDate::from_ymd_opt(2024, 1, 1), None);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["fromDate"], "2024-01-01");
        assert!(json.get("toDate").is_none());
        assert!(json.get("title").is_none());
    }

    #[test]
    fn blank_typed_parameters_read_as_absent() {
        let query: TaskQuery = serde_json::from_value(serde_json::json!({
            "status": "",
            "priority": "  ",
            "fromDate": "",
            "toDate": null,
        }))
        .unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn typed_parameters_parse_wire_names() {
        let query: TaskQuery = serde_json::from_value(serde_json::json!({
            "status": "In Progress",
            "priority": "high",
            "toDate": "2024-01-31",
        }))
        .unwrap();
        assert_eq!(query.status, Some(TaskStatus::InProgress));
        assert_eq!(query.priority, Some(Priority::High));
        assert_eq!(query.to_date, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn unparseable_typed_parameter_is_error() {
        let err = serde_json::from_value::<TaskQuery>(serde_json::json!({ "status": "Someday" }))
            .unwrap_err();
        assert!(err.to_string().contains("Someday"), "got: {err}");

        assert!(
            serde_json::from_value::<TaskQuery>(serde_json::json!({ "fromDate": "01/02/2024" }))
                .is_err()
        );
    }

    #[test]
    fn by_id_carries_text_form() {
        let id = TaskId::new();
        assert_eq!(TaskQuery::by_id(&id).id, Some(id.to_string()));
    }
}

//! Query/filter layer: turns a [`TaskQuery`] into one store lookup.
//!
//! An `id` parameter short-circuits everything else. Otherwise the present
//! parameters compile into a [`TaskFilter`], a conjunctive predicate the
//! store evaluates while listing newest first.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};

use crate::store::{StoreError, TaskRepository};

/// Errors that can occur while running a task query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The store could not be read.
    #[error("query failed: {0}")]
    Failed(#[from] StoreError),

    /// The tag parameter could not be compiled into a word matcher.
    #[error("invalid tag filter: {0}")]
    InvalidTag(#[from] regex::Error),
}

/// Conjunctive predicate compiled from the non-id query parameters.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    title: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    tag: Option<Regex>,
}

impl TaskFilter {
    /// Compiles the filter. Blank text parameters are treated as absent and
    /// `id` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidTag`] if the tag word cannot be compiled
    /// (for example, it exceeds the regex size limit).
    pub fn from_query(query: &TaskQuery) -> Result<Self, QueryError> {
        let title = non_blank(query.title.as_deref()).map(str::to_lowercase);
        let tag = non_blank(query.tag.as_deref())
            .map(|tag| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(tag)))
                    .case_insensitive(true)
                    .build()
            })
            .transpose()?;

        Ok(Self {
            title,
            status: query.status,
            priority: query.priority,
            from_date: query.from_date,
            to_date: query.to_date,
            tag,
        })
    }

    /// True when the filter places no constraint.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.tag.is_none()
    }

    /// Evaluates the predicate against one task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(needle) = &self.title
            && !task.title.to_lowercase().contains(needle.as_str())
        {
            return false;
        }
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if (self.from_date.is_some() || self.to_date.is_some()) && !self.due_in_range(task) {
            return false;
        }
        self.tag.as_ref().is_none_or(|re| re.is_match(&task.tags))
    }

    fn due_in_range(&self, task: &Task) -> bool {
        let Some(due) = task.due_date else {
            return false;
        };
        self.from_date.is_none_or(|from| due >= from) && self.to_date.is_none_or(|to| due <= to)
    }
}

/// Runs a query against the store.
///
/// With a non-blank `id`, the result is that task alone or empty; an id that
/// does not parse matches nothing. Otherwise every matching task is returned, newest
/// first.
///
/// # Errors
///
/// Returns [`QueryError::Failed`] if the store cannot be read, and
/// [`QueryError::InvalidTag`] if the tag filter cannot be compiled.
pub async fn run_query<S>(store: &S, query: &TaskQuery) -> Result<Vec<Task>, QueryError>
where
    S: TaskRepository,
{
    if let Some(raw_id) = non_blank(query.id.as_deref()) {
        let Ok(id) = raw_id.parse::<TaskId>() else {
            tracing::debug!(id = %raw_id, "query id is not a task id");
            return Ok(Vec::new());
        };
        let found = store.find_by_id(&id).await?;
        return Ok(found.into_iter().collect());
    }

    let filter = TaskFilter::from_query(query)?;
    let tasks = if filter.is_unconstrained() {
        store.find_all().await?
    } else {
        store.find_matching(move |task| filter.matches(task)).await?
    };
    tracing::debug!(count = tasks.len(), "query matched");
    Ok(tasks)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

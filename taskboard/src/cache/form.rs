//! Edit-form cache: the one task currently being created or edited.
//!
//! The form holds text exactly as typed. Only priority and status are typed
//! here, since the form offers them as fixed choices.

use std::fmt;
use std::str::FromStr;

use taskboard_proto::input::TaskInput;
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};

/// Errors from editing the form by field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// No form field has this name.
    #[error("unknown form field: {0}")]
    UnknownField(String),

    /// The value is not one of the field's choices.
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue {
        /// Field being set.
        field: FormField,
        /// Rejected value.
        value: String,
    },
}

/// An editable field, addressed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// `title`.
    Title,
    /// `description`.
    Description,
    /// `dueDate`.
    DueDate,
    /// `priority`.
    Priority,
    /// `tags`.
    Tags,
    /// `status`.
    Status,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Description,
        Self::DueDate,
        Self::Priority,
        Self::Tags,
        Self::Status,
    ];

    /// Wire name, matching the JSON body key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Tags => "tags",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Task-in-progress as held by the form.
///
/// [`TaskDraft::default`] is the empty template: blank text, `Low`
/// priority, `Not Started` status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title text.
    pub title: String,
    /// Free-form description; may be blank.
    pub description: String,
    /// `YYYY-MM-DD` as typed.
    pub due_date: String,
    /// Selected priority.
    pub priority: Priority,
    /// Raw comma-delimited tags as typed.
    pub tags: String,
    /// Selected status.
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Loads a stored task into form text.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority,
            tags: task.tags.clone(),
            status: task.status,
        }
    }

    /// Request body for this draft. Blank optional text is left out.
    #[must_use]
    pub fn to_input(&self) -> TaskInput {
        let present = |s: &str| Some(s.to_string()).filter(|v| !v.trim().is_empty());
        TaskInput {
            title: Some(self.title.clone()),
            description: present(&self.description),
            due_date: present(&self.due_date),
            priority: Some(self.priority.to_string()),
            tags: Some(self.tags.clone()),
            status: Some(self.status.to_string()),
        }
    }

    /// Sets one field from text.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidValue`] when `value` is not a valid
    /// priority or status choice.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let invalid = || FormError::InvalidValue {
            field,
            value: value.to_string(),
        };
        match field {
            FormField::Title => self.title = value.to_string(),
            FormField::Description => self.description = value.to_string(),
            FormField::DueDate => self.due_date = value.to_string(),
            FormField::Tags => self.tags = value.to_string(),
            FormField::Priority => self.priority = value.parse().map_err(|_| invalid())?,
            FormField::Status => self.status = value.parse().map_err(|_| invalid())?,
        }
        Ok(())
    }
}

/// Lifecycle of the edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    /// Holding the template.
    #[default]
    Empty,
    /// Holding a task exactly as loaded.
    Loaded,
    /// Edited since the last load or reset.
    Dirty,
}

/// The single task-in-progress, plus which stored task it edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditFormCache {
    draft: TaskDraft,
    editing: Option<TaskId>,
    state: FormState,
}

impl EditFormCache {
    /// A form holding the empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The task-in-progress.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Id of the stored task being edited; `None` while creating.
    #[must_use]
    pub const fn editing(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }

    /// Where the form is in its lifecycle.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// True when edited since the last load or reset.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == FormState::Dirty
    }

    /// Loads a whole task for editing.
    pub fn set_task(&mut self, task: &Task) {
        self.draft = TaskDraft::from_task(task);
        self.editing = Some(task.id.clone());
        self.state = FormState::Loaded;
    }

    /// Sets one field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidValue`] for an unknown priority or status;
    /// the form is left unchanged.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        self.draft.set(field, value)?;
        self.state = FormState::Dirty;
        Ok(())
    }

    /// Sets one field addressed by wire name, e.g. `"dueDate"`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] for names outside [`FormField`],
    /// and whatever [`EditFormCache::set_field`] returns.
    pub fn set_field_by_name(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let field = name.parse()?;
        self.set_field(field, value)
    }

    /// Back to the empty template.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

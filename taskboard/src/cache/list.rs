//! List-view cache: an ordered sequence of tasks.

use taskboard_proto::task::{Task, TaskId};

/// A single transition of the list cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Replace the whole sequence.
    ReplaceAll(Vec<Task>),
    /// Add one task at the end.
    Append(Task),
    /// Swap in a task with the same id, keeping its position.
    ReplaceById(Task),
    /// Drop the task with this id.
    RemoveById(TaskId),
}

/// Ordered, UI-local copy of the task list.
///
/// Mutations are synchronous and visible immediately; order is whatever the
/// last [`TaskListCache::replace_all`] supplied plus appends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListCache {
    tasks: Vec<Task>,
}

impl TaskListCache {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Current contents, in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of cached tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a cached task.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Replaces the whole sequence, taking its order as given.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Adds a task at the end.
    pub fn append(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replaces the task sharing `task.id`. Returns false, leaving the cache
    /// unchanged, when no such task is cached.
    pub fn replace_by_id(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the task with `id`, if cached.
    pub fn remove_by_id(&mut self, id: &TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Applies one transition.
    pub fn apply(&mut self, action: ListAction) {
        match action {
            ListAction::ReplaceAll(tasks) => self.replace_all(tasks),
            ListAction::Append(task) => self.append(task),
            ListAction::ReplaceById(task) => {
                if !self.replace_by_id(task) {
                    tracing::debug!("replace of uncached task ignored");
                }
            }
            ListAction::RemoveById(id) => {
                self.remove_by_id(&id);
            }
        }
    }

    /// Copies the current contents for a later [`TaskListCache::restore`].
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Puts back contents taken by [`TaskListCache::snapshot`].
    pub fn restore(&mut self, snapshot: Vec<Task>) {
        self.tasks = snapshot;
    }
}

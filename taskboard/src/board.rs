//! Task list controller.
//!
//! [`TaskBoard`] owns the [`TaskListCache`] and drives every mutation the
//! same way: validate the draft locally, change the cache optimistically,
//! send the request, then re-derive the list from the server. A failed
//! request restores the list as it was before the optimistic change.

use chrono::Utc;
use taskboard_proto::input::ValidationError;
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Task, TaskId};

use crate::cache::{ListAction, TaskDraft, TaskListCache};
use crate::client::{ClientError, TaskClient};
use crate::validate::{FormErrors, validate_draft};

/// Errors from board operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The draft failed client-side checks; nothing was sent.
    #[error("{0}")]
    Form(#[from] FormErrors),

    /// The draft could not be turned into task fields; nothing was sent.
    #[error(transparent)]
    Input(#[from] ValidationError),

    /// The server request failed; the list was rolled back.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Client-side controller for the task list.
#[derive(Debug)]
pub struct TaskBoard {
    client: TaskClient,
    list: TaskListCache,
    query: TaskQuery,
}

impl TaskBoard {
    /// A board with an empty list and no filter.
    #[must_use]
    pub fn new(client: TaskClient) -> Self {
        Self::with_cache(client, TaskListCache::new())
    }

    /// A board over an existing list cache.
    #[must_use]
    pub fn with_cache(client: TaskClient, list: TaskListCache) -> Self {
        Self {
            client,
            list,
            query: TaskQuery::all(),
        }
    }

    /// The cached list.
    #[must_use]
    pub const fn list(&self) -> &TaskListCache {
        &self.list
    }

    /// The query the list was last loaded with.
    #[must_use]
    pub const fn query(&self) -> &TaskQuery {
        &self.query
    }

    /// The HTTP client requests go through.
    #[must_use]
    pub const fn client(&self) -> &TaskClient {
        &self.client
    }

    /// Fetches the tasks matching `query` and replaces the list with them.
    /// Later mutations re-derive the list with the same query.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Client`] if the fetch fails; the list is left
    /// as it was.
    pub async fn load(&mut self, query: TaskQuery) -> Result<&[Task], BoardError> {
        let tasks = self.client.list(&query).await?;
        tracing::debug!(count = tasks.len(), "task list loaded");
        self.list.apply(ListAction::ReplaceAll(tasks));
        self.query = query;
        Ok(self.list.tasks())
    }

    /// Fetches one task, e.g. to fill an edit form.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Client`] if the task is unknown or the request
    /// fails.
    pub async fn fetch(&self, id: &TaskId) -> Result<Task, BoardError> {
        Ok(self.client.get(id).await?)
    }

    /// Creates a task from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Form`] or [`BoardError::Input`] without sending
    /// anything when the draft is invalid, and [`BoardError::Client`] after
    /// rolling back when the server rejects it.
    pub async fn submit_new(&mut self, draft: &TaskDraft) -> Result<Task, BoardError> {
        validate_draft(draft)?;
        let input = draft.to_input();
        let provisional = Task::create(input.clone().validate()?, Utc::now());

        let saved = self.list.snapshot();
        self.list.apply(ListAction::Append(provisional));

        match self.client.create(&input).await {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task created");
                self.rederive(saved, ListAction::Append(task.clone())).await;
                Ok(task)
            }
            Err(e) => Err(self.roll_back(saved, e)),
        }
    }

    /// Replaces a stored task with a draft.
    ///
    /// # Errors
    ///
    /// As [`TaskBoard::submit_new`]; an unknown id comes back as
    /// [`ClientError::NotFound`].
    pub async fn submit_edit(&mut self, id: &TaskId, draft: &TaskDraft) -> Result<Task, BoardError> {
        validate_draft(draft)?;
        let input = draft.to_input();
        let fields = input.clone().validate()?;

        let saved = self.list.snapshot();
        if let Some(mut provisional) = self.list.get(id).cloned() {
            provisional.replace_fields(fields, Utc::now());
            self.list.apply(ListAction::ReplaceById(provisional));
        }

        match self.client.update(id, &input).await {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task updated");
                self.rederive(saved, ListAction::ReplaceById(task.clone()))
                    .await;
                Ok(task)
            }
            Err(e) => Err(self.roll_back(saved, e)),
        }
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Client`] after rolling back if the request fails.
    pub async fn remove(&mut self, id: &TaskId) -> Result<(), BoardError> {
        let saved = self.list.snapshot();
        self.list.apply(ListAction::RemoveById(id.clone()));

        match self.client.delete(id).await {
            Ok(()) => {
                tracing::info!(task_id = %id, "task deleted");
                self.rederive(saved, ListAction::RemoveById(id.clone()))
                    .await;
                Ok(())
            }
            Err(e) => Err(self.roll_back(saved, e)),
        }
    }

    /// Deletes several tasks in one request and returns how many existed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Client`] after rolling back if the request fails.
    pub async fn remove_many(&mut self, ids: &[TaskId]) -> Result<usize, BoardError> {
        let saved = self.list.snapshot();
        for id in ids {
            self.list.apply(ListAction::RemoveById(id.clone()));
        }

        match self.client.delete_many(ids).await {
            Ok(deleted) => {
                tracing::info!(requested = ids.len(), deleted, "tasks deleted");
                if let Err(e) = self.refresh().await {
                    tracing::warn!(error = %e, "list refresh failed after bulk delete");
                }
                Ok(deleted)
            }
            Err(e) => Err(self.roll_back(saved, e)),
        }
    }

    async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = self.client.list(&self.query).await?;
        self.list.apply(ListAction::ReplaceAll(tasks));
        Ok(())
    }

    /// Reloads the list after a successful mutation. If the reload fails,
    /// falls back to the pre-mutation list with the confirmed change applied.
    async fn rederive(&mut self, saved: Vec<Task>, confirmed: ListAction) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "list refresh failed, applying confirmed change locally");
            self.list.restore(saved);
            self.list.apply(confirmed);
        }
    }

    fn roll_back(&mut self, saved: Vec<Task>, err: ClientError) -> BoardError {
        tracing::warn!(error = %err, "request failed, rolling back task list");
        self.list.restore(saved);
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::FormIssue;
    use taskboard_proto::task::TaskFields;

    fn unreachable_board(tasks: Vec<Task>) -> TaskBoard {
        let client = TaskClient::parse("http://127.0.0.1:9").unwrap();
        let mut list = TaskListCache::new();
        list.replace_all(tasks);
        TaskBoard::with_cache(client, list)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            due_date: "2024-03-01".to_string(),
            ..TaskDraft::default()
        }
    }

    fn stored(title: &str) -> Task {
        Task::create(TaskFields::new(title), Utc::now())
    }

    #[tokio::test]
    async fn invalid_draft_is_blocked_before_any_change() {
        let mut board = unreachable_board(vec![stored("a")]);
        let before = board.list().clone();

        let err = board.submit_new(&TaskDraft::default()).await.unwrap_err();
        match err {
            BoardError::Form(errors) => assert!(errors.contains(FormIssue::MissingTitle)),
            other => panic!("expected form errors, got {other:?}"),
        }
        assert_eq!(board.list(), &before);
    }

    #[tokio::test]
    async fn malformed_due_date_is_blocked() {
        let mut board = unreachable_board(Vec::new());
        let bad = TaskDraft {
            due_date: "next week".to_string(),
            ..draft("t")
        };
        let err = board.submit_new(&bad).await.unwrap_err();
        assert!(matches!(err, BoardError::Input(ValidationError::InvalidDueDate(_))));
        assert!(board.list().is_empty());
    }

    #[tokio::test]
    async fn failed_create_rolls_back() {
        let mut board = unreachable_board(vec![stored("a")]);
        let before = board.list().clone();

        let err = board.submit_new(&draft("new")).await.unwrap_err();
        assert!(matches!(err, BoardError::Client(ClientError::Http(_))));
        assert_eq!(board.list(), &before);
    }

    #[tokio::test]
    async fn failed_edit_rolls_back() {
        let task = stored("a");
        let mut board = unreachable_board(vec![task.clone()]);

        let result = board.submit_edit(&task.id, &draft("renamed")).await;
        assert!(result.is_err());
        assert_eq!(board.list().tasks(), &[task]);
    }

    #[tokio::test]
    async fn failed_remove_rolls_back() {
        let a = stored("a");
        let b = stored("b");
        let mut board = unreachable_board(vec![a.clone(), b.clone()]);

        assert!(board.remove(&a.id).await.is_err());
        assert!(board.remove_many(&[a.id.clone(), b.id.clone()]).await.is_err());
        assert_eq!(board.list().tasks(), &[a, b]);
    }

    #[tokio::test]
    async fn failed_load_keeps_list() {
        let mut board = unreachable_board(vec![stored("a")]);
        assert!(board.load(TaskQuery::all().with_tag("x")).await.is_err());
        assert_eq!(board.list().len(), 1);
        assert!(board.query().is_empty());
    }
}

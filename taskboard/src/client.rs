//! HTTP client for the task API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use taskboard_proto::api::{DeleteAck, DeleteManyRequest, ErrorBody, TaskEnvelope};
use taskboard_proto::input::TaskInput;
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Task, TaskId};
use url::Url;

/// Errors returned by [`TaskClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("server returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body.
        message: String,
    },

    /// The addressed task does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An endpoint URL could not be built from the base URL.
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Typed access to the task server.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base: Url,
}

impl TaskClient {
    /// Creates a client rooted at `base`. Endpoint paths are resolved
    /// relative to it, so `http://host/api` serves `http://host/api/tasks`.
    #[must_use]
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Parses `base` and creates a client for it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base` is not a valid URL.
    pub fn parse(base: &str) -> Result<Self, ClientError> {
        Ok(Self::new(Url::parse(base)?))
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Lists tasks matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an error status.
    pub async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, ClientError> {
        let resp = self
            .http
            .get(self.endpoint("tasks")?)
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for unknown ids.
    pub async fn get(&self, id: &TaskId) -> Result<Task, ClientError> {
        let resp = self.http.get(self.task_url(id)?).send().await?;
        decode(resp).await
    }

    /// Creates a task and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 if the server rejects the
    /// input.
    pub async fn create(&self, input: &TaskInput) -> Result<Task, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("tasks")?)
            .json(input)
            .send()
            .await?;
        let envelope: TaskEnvelope = decode(resp).await?;
        tracing::debug!(task_id = %envelope.todo.id, "task created");
        Ok(envelope.todo)
    }

    /// Replaces every mutable field of a task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for unknown ids and
    /// [`ClientError::Api`] for rejected input.
    pub async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task, ClientError> {
        let resp = self.http.put(self.task_url(id)?).json(input).send().await?;
        let envelope: TaskEnvelope = decode(resp).await?;
        Ok(envelope.todo)
    }

    /// Deletes a task. Unknown ids succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a server error.
    pub async fn delete(&self, id: &TaskId) -> Result<(), ClientError> {
        let resp = self.http.delete(self.task_url(id)?).send().await?;
        let _: DeleteAck = decode(resp).await?;
        Ok(())
    }

    /// Deletes every listed task and returns how many existed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a server error.
    pub async fn delete_many(&self, ids: &[TaskId]) -> Result<usize, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("tasks/delete")?)
            .json(&DeleteManyRequest { ids: ids.to_vec() })
            .send()
            .await?;
        let ack: DeleteAck = decode(resp).await?;
        Ok(ack.deleted.unwrap_or_default())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    fn task_url(&self, id: &TaskId) -> Result<Url, ClientError> {
        self.endpoint(&format!("tasks/{id}"))
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = resp
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| status.to_string(), |body| body.error);
    tracing::debug!(status = %status, error = %message, "task api error");

    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(message))
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

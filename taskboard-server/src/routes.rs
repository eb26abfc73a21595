//! HTTP routes: shared state, handlers, and server startup.
//!
//! Reads go through the query layer; writes validate the loose
//! [`TaskInput`] body once and hand typed fields to the store. Query strings
//! and bodies that fail to decode are answered like any other bad input,
//! with a 400 and an error body.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use taskboard_proto::api::{DeleteAck, DeleteManyRequest, TaskEnvelope};
use taskboard_proto::input::TaskInput;
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Task, TaskId};

use crate::error::ApiError;
use crate::query;
use crate::store::{MemoryStore, StoreError, TaskRepository};

/// Shared server state holding the task store.
pub struct AppState<S> {
    store: S,
}

impl<S: TaskRepository> AppState<S> {
    /// Wraps a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// Builds the task API router over the given state.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: TaskRepository + 'static,
{
    Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/tasks/delete", post(delete_many::<S>))
        .route(
            "/tasks/{id}",
            get(get_task::<S>)
                .put(update_task::<S>)
                .delete(delete_task::<S>),
        )
        .with_state(state)
}

/// `GET /tasks`: every task matching the query string, newest first.
async fn list_tasks<S: TaskRepository>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(query) = query?;
    let tasks = query::run_query(&state.store, &query).await?;
    Ok(Json(tasks))
}

/// `GET /tasks/{id}`: one task.
async fn get_task<S: TaskRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .store
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(raw_id))
}

/// `POST /tasks`: validate and create.
async fn create_task<S: TaskRepository>(
    State(state): State<Arc<AppState<S>>>,
    input: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskEnvelope>), ApiError> {
    let Json(input) = input?;
    let fields = input.validate()?;
    let todo = state.store.create(fields).await?;
    Ok((StatusCode::CREATED, Json(TaskEnvelope { todo })))
}

/// `PUT /tasks/{id}`: validate, then replace every mutable field.
async fn update_task<S: TaskRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(raw_id): Path<String>,
    input: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let Json(input) = input?;
    let fields = input.validate()?;
    let id = parse_id(&raw_id)?;
    let todo = state.store.update(&id, fields).await?;
    Ok(Json(TaskEnvelope { todo }))
}

/// `DELETE /tasks/{id}`: succeeds whether or not the task existed.
async fn delete_task<S: TaskRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    match raw_id.parse::<TaskId>() {
        Ok(id) => match state.store.delete_by_id(&id).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(task_id = %id, "delete of unknown task");
            }
            Err(e) => return Err(e.into()),
        },
        Err(_) => tracing::debug!(id = %raw_id, "delete with malformed id"),
    }
    Ok(Json(DeleteAck {
        success: true,
        deleted: None,
    }))
}

/// `POST /tasks/delete`: bulk delete by id set.
async fn delete_many<S: TaskRepository>(
    State(state): State<Arc<AppState<S>>>,
    request: Result<Json<DeleteManyRequest>, JsonRejection>,
) -> Result<Json<DeleteAck>, ApiError> {
    let Json(request) = request?;
    let deleted = state.store.delete_many(&request.ids).await?;
    Ok(Json(DeleteAck {
        success: true,
        deleted: Some(deleted),
    }))
}

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(raw.to_string()))
}

/// Starts the server with an empty in-memory store on the given address and
/// returns the bound address and a join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(AppState::new(MemoryStore::new()))).await
}

/// Starts the server over a pre-built [`AppState`].
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state<S>(
    addr: &str,
    state: Arc<AppState<S>>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
>
where
    S: TaskRepository + 'static,
{
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Starts the server in-process for testing.
///
/// Binds to `127.0.0.1:0` (OS-assigned port) and returns the bound address
/// and a [`tokio::task::JoinHandle`] for cleanup.
#[cfg(test)]
pub async fn start_test_server() -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
    start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server")
}

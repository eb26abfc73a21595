//! HTTP error mapping.
//!
//! Every handler returns [`ApiError`] on failure; it renders as a status code
//! plus an [`ErrorBody`] JSON object.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskboard_proto::api::ErrorBody;
use taskboard_proto::input::ValidationError;

use crate::query::QueryError;
use crate::store::StoreError;

/// Failure of a request, classified by how the caller should react.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed validation at the request boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The query string or body could not be decoded.
    #[error("{0}")]
    Malformed(String),

    /// The addressed task does not exist.
    #[error("task not found: {0}")]
    NotFound(String),

    /// The store failed underneath a write or lookup.
    #[error(transparent)]
    Store(StoreError),

    /// A list query failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id.to_string()),
            other => Self::Store(other),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Malformed(_) | Self::Query(QueryError::InvalidTag(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Query(QueryError::Failed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

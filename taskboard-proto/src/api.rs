//! JSON response and request bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// Body of a successful create or update (`{"todo": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    /// The stored record after the write.
    pub todo: Task,
}

/// Body of every error response (`{"error": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

impl ErrorBody {
    /// Wraps a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of a delete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    /// Always `true` when the request reached the store.
    pub success: bool,
    /// Number of documents removed, reported by bulk delete only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
}

/// Request body of the bulk delete endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteManyRequest {
    /// Ids to remove. Unknown ids are skipped.
    pub ids: Vec<TaskId>,
}

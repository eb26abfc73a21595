//! Binary snapshot format for the document store.
//!
//! A snapshot is a postcard-encoded [`Snapshot`]: a format version followed
//! by every task in creation order.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The snapshot was written by an unknown format version.
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the data.
        found: u16,
    },
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u16,
    tasks: Vec<Task>,
}

/// Encodes tasks, in creation order, into snapshot bytes.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if a task cannot be serialized.
pub fn encode_snapshot(tasks: &[Task]) -> Result<Vec<u8>, CodecError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        tasks: tasks.to_vec(),
    };
    postcard::to_allocvec(&snapshot).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes snapshot bytes back into tasks in creation order.
///
/// # Errors
///
/// Returns `CodecError::Serialization` on malformed bytes, or
/// `CodecError::UnsupportedVersion` if the version header is unknown.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<Task>, CodecError> {
    let snapshot: Snapshot =
        postcard::from_bytes(bytes).map_err(|e| CodecError::Serialization(e.to_string()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: snapshot.version,
        });
    }
    Ok(snapshot.tasks)
}

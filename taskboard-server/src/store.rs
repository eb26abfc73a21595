//! Task document store.
//!
//! [`TaskRepository`] is the contract the HTTP layer and the query layer
//! depend on. [`MemoryStore`] keeps documents in memory, ordered by
//! insertion, and can mirror them to a snapshot file that is rewritten after
//! every successful write.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use taskboard_proto::codec::{self, CodecError};
use taskboard_proto::task::{Task, TaskFields, TaskId};
use tokio::sync::RwLock;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document has the given id.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        /// Snapshot path involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot file could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Persistence contract for task documents.
///
/// Every operation is atomic with respect to a single document. Listing
/// operations return tasks newest first.
pub trait TaskRepository: Send + Sync {
    /// Looks up one task.
    fn find_by_id(
        &self,
        id: &TaskId,
    ) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// Every task, most recently created first.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Tasks satisfying `predicate`, most recently created first.
    fn find_matching<F>(
        &self,
        predicate: F,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send
    where
        F: Fn(&Task) -> bool + Send + Sync;

    /// Stores a new document with a fresh id and timestamps.
    fn create(&self, fields: TaskFields) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Replaces every mutable field of an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] for unknown ids.
    fn update(
        &self,
        id: &TaskId,
        fields: TaskFields,
    ) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Removes one document.
    ///
    /// Fails with [`StoreError::NotFound`] for unknown ids.
    fn delete_by_id(&self, id: &TaskId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes every listed document, skipping unknown ids. Returns how many
    /// were removed.
    fn delete_many(&self, ids: &[TaskId]) -> impl Future<Output = Result<usize, StoreError>> + Send;
}

/// Documents keyed by insertion sequence, plus an id index.
#[derive(Debug, Clone, Default)]
struct Documents {
    by_seq: BTreeMap<u64, Task>,
    index: HashMap<TaskId, u64>,
    next_seq: u64,
}

impl Documents {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut docs = Self::default();
        for task in tasks {
            docs.insert(task);
        }
        docs
    }

    fn insert(&mut self, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(old) = self.index.insert(task.id.clone(), seq) {
            self.by_seq.remove(&old);
        }
        self.by_seq.insert(seq, task);
    }

    fn get(&self, id: &TaskId) -> Option<&Task> {
        self.index.get(id).and_then(|seq| self.by_seq.get(seq))
    }

    fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        let seq = self.index.get(id)?;
        self.by_seq.get_mut(seq)
    }

    fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let seq = self.index.remove(id)?;
        self.by_seq.remove(&seq)
    }

    fn newest_first(&self) -> impl Iterator<Item = &Task> {
        self.by_seq.values().rev()
    }

    fn creation_order(&self) -> Vec<Task> {
        self.by_seq.values().cloned().collect()
    }
}

/// In-memory document store with optional snapshot persistence.
///
/// Thread-safe via [`RwLock`]. Writes hold the write lock until the snapshot
/// (if any) is on disk; a failed snapshot write leaves the in-memory state
/// unchanged.
pub struct MemoryStore {
    docs: RwLock<Documents>,
    snapshot_path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, purely in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Documents::default()),
            snapshot_path: None,
        }
    }

    /// Opens a store backed by a snapshot file.
    ///
    /// A missing file starts an empty store; it is created on the first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Codec`] if its contents are not a valid snapshot.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = match tokio::fs::read(&path).await {
            Ok(bytes) => codec::decode_snapshot(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::info!(path = %path.display(), count = tasks.len(), "opened task snapshot");
        Ok(Self {
            docs: RwLock::new(Documents::from_tasks(tasks)),
            snapshot_path: Some(path),
        })
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.by_seq.len()
    }

    /// Returns true if the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.by_seq.is_empty()
    }

    /// Runs a mutation under the write lock and persists the result.
    ///
    /// With a snapshot file, the mutation is applied to a copy that only
    /// replaces the live documents once the snapshot has been written.
    async fn write<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Documents) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut docs = self.docs.write().await;
        let Some(path) = self.snapshot_path.as_deref() else {
            return mutate(&mut *docs);
        };

        let mut next = docs.clone();
        let out = mutate(&mut next)?;
        write_snapshot(path, &next.creation_order()).await?;
        *docs = next;
        drop(docs);
        Ok(out)
    }
}

/// Writes the snapshot to a sibling temp file, then renames it into place.
async fn write_snapshot(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let bytes = codec::encode_snapshot(tasks)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "snapshot written");
    Ok(())
}

impl TaskRepository for MemoryStore {
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.docs.read().await.newest_first().cloned().collect())
    }

    async fn find_matching<F>(&self, predicate: F) -> Result<Vec<Task>, StoreError>
    where
        F: Fn(&Task) -> bool + Send + Sync,
    {
        let docs = self.docs.read().await;
        Ok(docs
            .newest_first()
            .filter(|&task| predicate(task))
            .cloned()
            .collect())
    }

    async fn create(&self, fields: TaskFields) -> Result<Task, StoreError> {
        let task = Task::create(fields, Utc::now());
        let stored = task.clone();
        self.write(move |docs| {
            docs.insert(stored);
            Ok(())
        })
        .await?;
        tracing::info!(task_id = %task.id, "task created");
        Ok(task)
    }

    async fn update(&self, id: &TaskId, fields: TaskFields) -> Result<Task, StoreError> {
        let task = self
            .write(|docs| {
                let task = docs
                    .get_mut(id)
                    .ok_or_else(|| StoreError::NotFound(id.clone()))?;
                task.replace_fields(fields, Utc::now());
                Ok(task.clone())
            })
            .await?;
        tracing::info!(task_id = %id, "task updated");
        Ok(task)
    }

    async fn delete_by_id(&self, id: &TaskId) -> Result<(), StoreError> {
        self.write(|docs| {
            docs.remove(id)
                .map(drop)
                .ok_or_else(|| StoreError::NotFound(id.clone()))
        })
        .await?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    async fn delete_many(&self, ids: &[TaskId]) -> Result<usize, StoreError> {
        let removed = self
            .write(|docs| Ok(ids.iter().filter(|id| docs.remove(id).is_some()).count()))
            .await?;
        tracing::info!(requested = ids.len(), removed, "bulk delete");
        Ok(removed)
    }
}

use std::fs;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::debug;

use crate::snapshot::SessionSnapshot;

/// How long a saved session stays restorable.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to persist snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable cache for the current session. Only one snapshot exists at a
/// time; `save` overwrites it (last writer wins).
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), StoreError>;

    /// Returns the cached snapshot, or `None` when nothing was saved, the
    /// bytes no longer decode, or the retention window has passed.
    fn load(&self) -> Option<SessionSnapshot>;

    fn clear(&mut self);
}

/// Process-local store, mainly for tests and offline use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<SessionSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Option<SessionSnapshot> {
        let snapshot = self.snapshot.as_ref()?;
        if snapshot.is_stale(Utc::now(), Duration::days(DEFAULT_RETENTION_DAYS)) {
            return None;
        }
        Some(snapshot.clone())
    }

    fn clear(&mut self) {
        self.snapshot = None;
    }
}

/// Stores the snapshot as a single binary file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    retention: Duration,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_retention(path, Duration::days(DEFAULT_RETENTION_DAYS))
    }

    pub fn with_retention(path: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            path: path.into(),
            retention,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        let bytes = snapshot.encode()?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn load(&self) -> Option<SessionSnapshot> {
        let bytes = fs::read(&self.path).ok()?;
        let snapshot = SessionSnapshot::decode(&bytes)?;
        if snapshot.is_stale(Utc::now(), self.retention) {
            debug!(path = %self.path.display(), "discarding expired session snapshot");
            let _ = fs::remove_file(&self.path);
            return None;
        }
        Some(snapshot)
    }

    fn clear(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

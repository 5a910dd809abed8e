//! File system event types.

#![allow(clippy::missing_const_for_fn)]

use std::path::{Path, PathBuf};

use crate::sync::SyncOutcome;

/// A created-or-modified notification for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl WatchEvent {
    /// Event for `path`, checking the file system for its kind.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Self {
        let is_dir = path.is_dir();
        Self { path, is_dir }
    }

    /// Event for a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Event for a directory.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Events delivered together by the backend, deduplicated by path.
#[derive(Debug, Default)]
pub struct EventBatch {
    pub events: Vec<WatchEvent>,
}

impl EventBatch {
    /// Create a new empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event unless one for the same path is already queued.
    pub fn add(&mut self, event: WatchEvent) {
        if !self.events.iter().any(|e| e.path == event.path) {
            self.events.push(event);
        }
    }

    /// Check if batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get total number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl IntoIterator for EventBatch {
    type Item = WatchEvent;
    type IntoIter = std::vec::IntoIter<WatchEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// What the dispatcher did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Directory events carry no work.
    IgnoredDirectory,
    /// Another event for the same path was accepted too recently.
    Debounced,
    /// The inclusion list changed; `added` lists entries new since the
    /// last snapshot.
    InclusionReloaded { added: Vec<String> },
    /// The exclusion list changed; `resynced` existing listed files were
    /// synchronized again.
    ExclusionReloaded { resynced: usize },
    /// A managed file changed and its header was synchronized.
    Synced(SyncOutcome),
    /// The path is not managed.
    OutOfScope,
}

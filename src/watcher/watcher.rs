//! File system watcher using notify-rs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use parking_lot::Mutex;

use super::events::{EventBatch, WatchEvent};
use crate::error::WatcherError;
use crate::Result;

/// Coalescing latency of the notify backend.
const DEFAULT_LATENCY: Duration = Duration::from_millis(50);

/// Capability to add watch roots while running.
pub trait WatchRoots: Send + Sync {
    /// Watch `dir` recursively. Returns `false` if it was already watched.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the directory.
    fn add_root(&self, dir: &Path) -> Result<bool>;
}

/// File watcher configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce latency handed to notify.
    pub latency: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }
}

type Slot = Mutex<Option<Debouncer<RecommendedWatcher>>>;

/// File system watcher.
///
/// Events are handed to the callback given to [`FileWatcher::start`] on
/// the backend's own thread.
pub struct FileWatcher {
    slot: Arc<Slot>,
    roots: Arc<Mutex<BTreeSet<PathBuf>>>,
    latency: Duration,
    /// Held while a batch is being handled.
    busy: Arc<Mutex<()>>,
    stopped: Arc<AtomicBool>,
}

/// Cheap handle for registering roots from inside event callbacks.
///
/// Holds the backend weakly so a callback that owns a handle does not keep
/// its own watcher alive.
#[derive(Clone)]
pub struct WatchHandle {
    slot: Weak<Slot>,
    roots: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl FileWatcher {
    /// Create a watcher; nothing is watched until [`start`](Self::start).
    #[must_use]
    pub fn new(config: &WatcherConfig) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            roots: Arc::new(Mutex::new(BTreeSet::new())),
            latency: config.latency,
            busy: Arc::new(Mutex::new(())),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for adding roots later.
    #[must_use]
    pub fn handle(&self) -> WatchHandle {
        WatchHandle {
            slot: Arc::downgrade(&self.slot),
            roots: Arc::clone(&self.roots),
        }
    }

    /// Start the backend, delivering every batch to `on_batch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher cannot be created.
    pub fn start<F>(&self, on_batch: F) -> Result<()>
    where
        F: Fn(EventBatch) + Send + 'static,
    {
        let busy = Arc::clone(&self.busy);
        let stopped = Arc::clone(&self.stopped);
        self.stopped.store(false, Ordering::SeqCst);

        let debouncer = new_debouncer(
            self.latency,
            move |result: std::result::Result<
                Vec<notify_debouncer_mini::DebouncedEvent>,
                notify::Error,
            >| {
                match result {
                    Ok(events) => {
                        let mut batch = EventBatch::new();
                        for event in events {
                            if matches!(event.kind, DebouncedEventKind::Any) {
                                batch.add(WatchEvent::from_path(event.path));
                            }
                        }

                        let _running = busy.lock();
                        if !batch.is_empty() && !stopped.load(Ordering::SeqCst) {
                            on_batch(batch);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                    }
                }
            },
        )
        .map_err(|e| WatcherError::watch_failed("init", e))?;

        *self.slot.lock() = Some(debouncer);
        tracing::debug!(latency = ?self.latency, "Watcher started");
        Ok(())
    }

    /// Add a directory to watch.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be watched.
    pub fn watch(&self, path: impl AsRef<Path>) -> Result<bool> {
        self.handle().add_root(path.as_ref())
    }

    /// Get list of watched directories.
    #[must_use]
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        self.roots.lock().iter().cloned().collect()
    }

    /// Stop the backend and wait for a batch in progress to finish.
    ///
    /// No callback runs after this returns. Must not be called from inside
    /// the callback.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let debouncer = self.slot.lock().take();
        if let Some(debouncer) = debouncer {
            drop(debouncer);
            drop(self.busy.lock());
            tracing::debug!("Watcher stopped");
        }
    }
}

impl WatchRoots for WatchHandle {
    fn add_root(&self, dir: &Path) -> Result<bool> {
        if !dir.is_dir() {
            return Err(WatcherError::watch_failed(
                dir.display().to_string(),
                "directory does not exist",
            )
            .into());
        }
        if self.roots.lock().contains(dir) {
            return Ok(false);
        }

        let slot = self.slot.upgrade().ok_or(WatcherError::NotStarted)?;
        let mut guard = slot.lock();
        let debouncer = guard.as_mut().ok_or(WatcherError::NotStarted)?;
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::Recursive)
            .map_err(|e| WatcherError::watch_failed(dir.display().to_string(), e))?;
        drop(guard);

        self.roots.lock().insert(dir.to_path_buf());
        tracing::info!(path = %dir.display(), "Watching directory");
        Ok(true)
    }
}

//! Routes watch events to list reloads, header syncs and tree refreshes.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use super::events::{Dispatch, EventBatch, WatchEvent};
use super::watcher::WatchRoots;
use crate::patterns::InclusionList;
use crate::sync::{Debounce, SyncEngine};

/// Which kind of file an event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    InclusionList,
    ExclusionList,
    Other,
}

/// Event dispatcher.
///
/// Keeps the inclusion snapshot used to detect newly listed files and
/// registers new watch roots as the list grows.
pub struct Dispatcher {
    engine: Arc<SyncEngine>,
    roots: Arc<dyn WatchRoots>,
    event_debounce: Debounce,
    known: Mutex<HashSet<String>>,
}

impl Dispatcher {
    /// Create a dispatcher, snapshotting the current inclusion list.
    #[must_use]
    pub fn new(engine: Arc<SyncEngine>, roots: Arc<dyn WatchRoots>) -> Self {
        let known = engine.store().inclusion().as_set().clone();
        let event_debounce = Debounce::new(engine.config().event_debounce);
        Self {
            engine,
            roots,
            event_debounce,
            known: Mutex::new(known),
        }
    }

    /// Classify `path` against the two list files.
    #[must_use]
    pub fn classify(&self, path: &Path) -> EventClass {
        let config = self.engine.config();
        let abs = self.engine.resolve(path);
        if abs == config.watchlist_path() {
            EventClass::InclusionList
        } else if abs == config.donotwatchlist_path() {
            EventClass::ExclusionList
        } else {
            EventClass::Other
        }
    }

    /// Handle every event of a backend batch.
    pub fn dispatch_batch(&self, batch: EventBatch) {
        for event in batch {
            let outcome = self.dispatch(&event);
            tracing::trace!(path = %event.path.display(), ?outcome, "Dispatched event");
        }
    }

    /// Handle one created-or-modified event.
    pub fn dispatch(&self, event: &WatchEvent) -> Dispatch {
        if event.is_dir {
            return Dispatch::IgnoredDirectory;
        }

        let key = self.engine.relative_path(&event.path);
        if !self.event_debounce.try_accept(&key) {
            return Dispatch::Debounced;
        }

        match self.classify(&event.path) {
            EventClass::InclusionList => {
                tracing::info!("Watch list changed, reloading");
                let added = self.on_inclusion_changed();
                Dispatch::InclusionReloaded { added }
            }
            EventClass::ExclusionList => {
                tracing::info!("Exclusion list changed, resyncing headers");
                let resynced = self.engine.sync_listed().len();
                self.engine.refresh_tree();
                Dispatch::ExclusionReloaded { resynced }
            }
            EventClass::Other => {
                if !self.engine.is_in_scope(&event.path) {
                    return Dispatch::OutOfScope;
                }
                tracing::debug!(path = %key, "Detected change");
                let outcome = self.engine.update_header(&event.path);
                self.engine.refresh_tree();
                Dispatch::Synced(outcome)
            }
        }
    }

    /// Watch every existing directory holding an inclusion entry.
    pub fn register_roots(&self, inclusion: &InclusionList) {
        let root = &self.engine.config().root;
        for dir in inclusion.watched_dirs() {
            let abs = if dir == "." {
                root.clone()
            } else {
                root.join(&dir)
            };
            if !abs.is_dir() {
                continue;
            }
            if let Err(e) = self.roots.add_root(&abs) {
                tracing::warn!(path = %abs.display(), error = %e, "Failed to watch directory");
            }
        }
    }

    fn on_inclusion_changed(&self) -> Vec<String> {
        let inclusion = self.engine.store().inclusion();

        let added: Vec<String> = {
            let known = self.known.lock();
            let mut seen = HashSet::new();
            inclusion
                .entries()
                .iter()
                .filter(|entry| !known.contains(*entry) && seen.insert(entry.as_str()))
                .cloned()
                .collect()
        };

        if !added.is_empty() {
            tracing::info!(added = ?added, "New files in watch list");
            self.register_roots(&inclusion);
            self.engine.sync_paths(&added);
        }

        *self.known.lock() = inclusion.as_set().clone();
        self.engine.refresh_tree();
        added
    }
}

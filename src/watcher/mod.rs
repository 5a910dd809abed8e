//! File system watching.
//!
//! This module provides:
//! - Recursive directory watching using notify-rs
//! - Runtime registration of new watch roots
//! - Event dispatch to list reloads, header syncs and tree refreshes

mod dispatcher;
mod events;
#[allow(clippy::module_inception)]
mod watcher;

pub use dispatcher::{Dispatcher, EventClass};
pub use events::{Dispatch, EventBatch, WatchEvent};
pub use watcher::{FileWatcher, WatchHandle, WatchRoots, WatcherConfig};

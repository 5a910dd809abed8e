//! Header synchronization.
//!
//! This module provides:
//! - The shared engine context (`SyncEngine`) with scope resolution, the
//!   per-path rewrite debounce and the global rewrite lock
//! - Debounce maps reused by the event dispatcher
//! - Startup bootstrap of the tree and list files

mod bootstrap;
mod debounce;
mod engine;

pub use bootstrap::{
    ensure_list_files, ensure_tree_file, missing_entries, report_missing, TREE_FILE_PLACEHOLDER,
};
pub use debounce::Debounce;
pub use engine::{SyncEngine, SyncOutcome, SyncStats, SyncStatsSnapshot};

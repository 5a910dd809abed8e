//! Synchronization engine: scope resolution and header rewrites.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::debounce::Debounce;
use crate::config::Config;
use crate::error::HeaderError;
use crate::header::{apply_header, build_header, comment_syntax_for_path, is_supported};
use crate::patterns::{normalize_path, ExclusionSet, InclusionList, PatternStore};
use crate::tree::render_tree;
use crate::Result;

/// Result of one header synchronization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// New content was written.
    Written,
    /// The file already carried the exact header; nothing was written.
    Unchanged,
    /// The path is not managed.
    OutOfScope,
    /// The path was rewritten too recently.
    Debounced,
    /// Reading or writing failed; the file is untouched.
    Failed,
}

/// Counters for header synchronization.
#[derive(Debug, Default)]
pub struct SyncStats {
    pub written: AtomicU64,
    pub unchanged: AtomicU64,
    pub debounced: AtomicU64,
    pub failed: AtomicU64,
}

impl SyncStats {
    /// Get snapshot of current stats.
    #[must_use]
    pub fn snapshot(&self) -> SyncStatsSnapshot {
        SyncStatsSnapshot {
            written: self.written.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            debounced: self.debounced.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of sync stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatsSnapshot {
    pub written: u64,
    pub unchanged: u64,
    pub debounced: u64,
    pub failed: u64,
}

/// Shared engine context: configuration, list access, rewrite debounce
/// and the global rewrite lock.
#[derive(Debug)]
pub struct SyncEngine {
    config: Config,
    store: PatternStore,
    reserved: Vec<String>,
    tree_rel: String,
    rewrite_debounce: Debounce,
    rewrite_lock: Mutex<()>,
    stats: SyncStats,
}

impl SyncEngine {
    /// Create an engine for `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = PatternStore::new(config.watchlist_path(), config.donotwatchlist_path());
        let reserved = config.reserved_names();
        let tree_rel = normalize_path(&config.tree_file.to_string_lossy());
        let rewrite_debounce = Debounce::new(config.rewrite_debounce);

        Self {
            config,
            store,
            reserved,
            tree_rel,
            rewrite_debounce,
            rewrite_lock: Mutex::new(()),
            stats: SyncStats::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &PatternStore {
        &self.store
    }

    #[must_use]
    pub fn stats(&self) -> SyncStatsSnapshot {
        self.stats.snapshot()
    }

    /// `path` joined onto the project root when relative.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.root.join(path)
        }
    }

    /// Forward-slash path relative to the project root.
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        let abs = self.resolve(path);
        let rel = abs.strip_prefix(&self.config.root).unwrap_or(abs.as_path());
        normalize_path(&rel.to_string_lossy())
    }

    /// Whether `path` is the designated tree file.
    #[must_use]
    pub fn is_tree_file(&self, path: &Path) -> bool {
        self.relative_path(path) == self.tree_rel
    }

    /// Whether the file name of `path` is one of the reserved names.
    #[must_use]
    pub fn is_reserved(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| n.to_string_lossy())
            .is_some_and(|name| self.reserved.iter().any(|r| *r == name))
    }

    /// Whether `path` is a managed file right now.
    ///
    /// Reads both lists from disk.
    #[must_use]
    pub fn is_in_scope(&self, path: &Path) -> bool {
        let inclusion = self.store.inclusion();
        let exclusions = self.store.exclusions();
        self.is_in_scope_with(path, &inclusion, &exclusions)
    }

    fn is_in_scope_with(
        &self,
        path: &Path,
        inclusion: &InclusionList,
        exclusions: &ExclusionSet,
    ) -> bool {
        let abs = self.resolve(path);
        let rel = self.relative_path(&abs);

        if self.is_reserved(&abs) || !abs.is_file() {
            return false;
        }
        if let Some(pattern) = exclusions.first_match(&rel) {
            tracing::debug!(path = %rel, %pattern, "Excluded by pattern");
            return false;
        }
        inclusion.contains(&rel) && is_supported(&abs)
    }

    /// Synchronize the header of one file.
    ///
    /// Out-of-scope paths are skipped (the tree file is always eligible),
    /// as are paths rewritten less than the rewrite debounce window ago.
    /// Failures are logged and leave the file untouched.
    pub fn update_header(&self, path: &Path) -> SyncOutcome {
        let abs = self.resolve(path);
        let rel = self.relative_path(&abs);
        let is_tree = rel == self.tree_rel;

        if !is_tree && !self.is_in_scope(&abs) {
            return SyncOutcome::OutOfScope;
        }

        let _guard = self.rewrite_lock.lock();

        if !self.rewrite_debounce.is_ready(&rel) {
            self.stats.debounced.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(path = %rel, "Rewrite debounced");
            return SyncOutcome::Debounced;
        }

        match self.rewrite(&abs, &rel, is_tree) {
            Ok(true) => {
                self.rewrite_debounce.record(&rel);
                self.stats.written.fetch_add(1, Ordering::Relaxed);
                tracing::info!(path = %rel, "Updated header");
                SyncOutcome::Written
            }
            Ok(false) => {
                self.rewrite_debounce.record(&rel);
                self.stats.unchanged.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(path = %rel, "Header already current");
                SyncOutcome::Unchanged
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(path = %rel, error = %e, "Error updating header");
                SyncOutcome::Failed
            }
        }
    }

    /// Re-render the tree into the tree file, if it exists.
    pub fn refresh_tree(&self) -> SyncOutcome {
        let path = self.config.tree_file_path();
        if !path.exists() {
            tracing::debug!(path = %self.tree_rel, "Tree file missing, not refreshed");
            return SyncOutcome::OutOfScope;
        }
        self.update_header(&path)
    }

    /// Synchronize every inclusion-listed file that exists.
    pub fn sync_listed(&self) -> Vec<(String, SyncOutcome)> {
        self.sync_paths(self.store.inclusion().entries())
    }

    /// Synchronize the given root-relative paths, skipping missing ones.
    pub fn sync_paths<S: AsRef<str>>(&self, rel_paths: &[S]) -> Vec<(String, SyncOutcome)> {
        rel_paths
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|rel| self.config.root.join(rel).exists())
            .map(|rel| (rel.to_string(), self.update_header(Path::new(rel))))
            .collect()
    }

    /// Current project tree, rendered with the lists as they are on disk.
    #[must_use]
    pub fn render_project_tree(&self) -> String {
        let inclusion = self.store.inclusion();
        let exclusions = self.store.exclusions();
        render_tree(&self.config.root, &inclusion, &exclusions)
    }

    /// Extra header content for the tree file: guidance, then the tree.
    #[must_use]
    pub fn tree_extra_lines(&self) -> Vec<String> {
        let watchlist = self.config.watchlist_name();
        let donotwatchlist = self.config.donotwatchlist_name();
        let mut lines = vec![
            "Project Tree Structure:".to_string(),
            String::new(),
            format!("NOTE TO ASSISTANT: Remember to add new files to {watchlist} to receive headers."),
            format!(
                "      Files not in {watchlist} won't receive headers, even if visible in this tree."
            ),
            String::new(),
            "NOTE TO ASSISTANT: If you notice directories that don't add value to the context"
                .to_string(),
            format!(
                "      (like build outputs, cache, etc), suggest adding them to {donotwatchlist}"
            ),
            "      to keep the tree structure focused and clean.".to_string(),
            String::new(),
        ];
        lines.extend(self.render_project_tree().lines().map(String::from));
        lines.push(String::new());
        lines
    }

    fn rewrite(&self, abs: &Path, rel: &str, is_tree: bool) -> Result<bool> {
        let bytes = fs::read(abs).map_err(|e| HeaderError::Read {
            path: rel.to_string(),
            reason: e.to_string(),
        })?;
        let content = String::from_utf8(bytes).map_err(|_| HeaderError::Encoding {
            path: rel.to_string(),
        })?;

        let syntax = comment_syntax_for_path(abs);
        let extra = is_tree.then(|| self.tree_extra_lines());
        let header = build_header(rel, syntax, extra.as_deref());
        let updated = apply_header(&content, &header, syntax)?;

        if updated == content {
            return Ok(false);
        }

        write_atomic(abs, &updated).map_err(|e| HeaderError::Write {
            path: rel.to_string(),
            reason: e.to_string(),
        })?;
        Ok(true)
    }
}

/// Replace `path` with `contents` via a sibling temp file and a rename, so
/// readers see either the old or the new file.
///
/// Symlinks are resolved first; the link stays and its target is replaced.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("/"));
    let permissions = fs::metadata(&target)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

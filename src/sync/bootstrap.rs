//! Startup checks: the tree file and both list files must exist.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::patterns::PatternStore;
use crate::{Error, Result};

/// Initial content of a freshly created tree file.
pub const TREE_FILE_PLACEHOLDER: &str =
    "# This file will be automatically updated with the project tree structure\n";

const WATCHLIST_PLACEHOLDER: &str = "# List files to be watched (one per line)\n\
# Lines starting with # are ignored\n";

const DONOTWATCHLIST_PLACEHOLDER: &str =
    "# List regex patterns for files/paths to exclude (one per line)\n\
# Lines starting with # are ignored\n\
# Example patterns:\n\
# secret/.*      # Excludes all files in 'secret' directory\n\
# .*\\.log$       # Excludes all .log files\n\
# .*secret.*     # Excludes any file with 'secret' in the path\n";

/// Create the tree file if it is missing.
///
/// Returns `true` when the file was created.
///
/// # Errors
///
/// Returns [`Error::TreeFile`] if the file cannot be created; the watcher
/// cannot run without it.
pub fn ensure_tree_file(config: &Config) -> Result<bool> {
    let path = config.tree_file_path();
    if path.exists() {
        return Ok(false);
    }

    create_with(&path, TREE_FILE_PLACEHOLDER).map_err(|e| Error::TreeFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), "Created tree file");
    Ok(true)
}

/// Create missing list files with explanatory comments.
///
/// Failures are logged; an absent list reads as empty.
pub fn ensure_list_files(config: &Config) -> Vec<PathBuf> {
    let mut created = Vec::new();
    for (path, placeholder) in [
        (config.watchlist_path(), WATCHLIST_PLACEHOLDER),
        (config.donotwatchlist_path(), DONOTWATCHLIST_PLACEHOLDER),
    ] {
        if path.exists() {
            continue;
        }
        match create_with(&path, placeholder) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Created list file");
                created.push(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to create list file");
            }
        }
    }
    created
}

/// Inclusion entries that do not exist on disk yet.
#[must_use]
pub fn missing_entries(store: &PatternStore, root: &Path) -> Vec<String> {
    store
        .inclusion()
        .entries()
        .iter()
        .filter(|entry| !root.join(entry).exists())
        .cloned()
        .collect()
}

/// Warn once about inclusion entries that do not exist yet.
pub fn report_missing(store: &PatternStore, root: &Path) -> Vec<String> {
    let missing = missing_entries(store, root);
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "Files listed in {} do not exist; they will be watched once created",
            store.watchlist_path().display()
        );
    }
    missing
}

fn create_with(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_tree_file_creates_placeholder() {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());

        assert!(ensure_tree_file(&config).unwrap());
        assert_eq!(
            fs::read_to_string(config.tree_file_path()).unwrap(),
            TREE_FILE_PLACEHOLDER
        );
        assert!(!ensure_tree_file(&config).unwrap());
    }

    #[test]
    fn test_ensure_tree_file_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("blocker"), "not a directory").unwrap();
        let config = Config {
            tree_file: PathBuf::from("blocker/TREE.md"),
            ..Config::with_root(tmp.path())
        };

        let err = ensure_tree_file(&config).unwrap_err();
        assert!(matches!(err, Error::TreeFile { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_ensure_list_files() {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());
        fs::write(config.watchlist_path(), "src/app.py\n").unwrap();

        let created = ensure_list_files(&config);
        assert_eq!(created, vec![config.donotwatchlist_path()]);
        assert_eq!(
            fs::read_to_string(config.watchlist_path()).unwrap(),
            "src/app.py\n"
        );

        // The placeholder comments parse to an empty list.
        let store = PatternStore::new(config.watchlist_path(), config.donotwatchlist_path());
        assert!(store.load_exclusion_patterns().is_empty());
    }

    #[test]
    fn test_missing_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".watchlist"), "here.py\nnot_yet.py\n").unwrap();
        fs::write(tmp.path().join("here.py"), "").unwrap();
        let store = PatternStore::new(
            tmp.path().join(".watchlist"),
            tmp.path().join(".donotwatchlist"),
        );

        assert_eq!(report_missing(&store, tmp.path()), vec!["not_yet.py"]);
    }
}

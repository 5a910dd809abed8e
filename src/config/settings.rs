//! Configuration settings and validation.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the entry point; never treated as a managed file.
pub const ENTRY_POINT_NAME: &str = env!("CARGO_PKG_NAME");

/// Main configuration for headerwatch.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root. Every relative path is computed against it.
    pub root: PathBuf,

    /// Inclusion-list file, relative to `root`.
    pub watchlist: PathBuf,

    /// Exclusion-list file, relative to `root`.
    pub donotwatchlist: PathBuf,

    /// Designated tree file, relative to `root`.
    pub tree_file: PathBuf,

    /// Minimum gap between two accepted raw events for the same path.
    pub event_debounce: Duration,

    /// Minimum gap between two accepted header rewrites for the same path.
    pub rewrite_debounce: Duration,

    /// Coalescing latency handed to the file event backend.
    pub watch_latency: Duration,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            watchlist: PathBuf::from(".watchlist"),
            donotwatchlist: PathBuf::from(".donotwatchlist"),
            tree_file: PathBuf::from(".cursorrules"),
            event_debounce: Duration::from_millis(100),
            rewrite_debounce: Duration::from_millis(1000),
            watch_latency: Duration::from_millis(50),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default configuration rooted at `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if !self.root.is_dir() {
            return Err(Error::config(format!(
                "root '{}' is not a directory",
                self.root.display()
            )));
        }

        let managed = [
            ("watchlist", &self.watchlist),
            ("donotwatchlist", &self.donotwatchlist),
            ("tree_file", &self.tree_file),
        ];
        for (field, path) in managed {
            if path.file_name().is_none() {
                return Err(Error::config(format!("{field} must name a file")));
            }
        }
        for (i, (field, path)) in managed.iter().enumerate() {
            if let Some((other, _)) = managed[i + 1..].iter().find(|(_, p)| p == path) {
                return Err(Error::config(format!(
                    "{field} and {other} point at the same file '{}'",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Absolute (root-joined) path of the inclusion list.
    #[must_use]
    pub fn watchlist_path(&self) -> PathBuf {
        self.root.join(&self.watchlist)
    }

    /// Absolute (root-joined) path of the exclusion list.
    #[must_use]
    pub fn donotwatchlist_path(&self) -> PathBuf {
        self.root.join(&self.donotwatchlist)
    }

    /// Absolute (root-joined) path of the designated tree file.
    #[must_use]
    pub fn tree_file_path(&self) -> PathBuf {
        self.root.join(&self.tree_file)
    }

    /// File names that are never treated as ordinary managed files.
    #[must_use]
    pub fn reserved_names(&self) -> Vec<String> {
        let mut names = vec![ENTRY_POINT_NAME.to_string()];
        names.extend(
            [&self.watchlist, &self.donotwatchlist, &self.tree_file]
                .into_iter()
                .filter_map(|p| file_name(p)),
        );
        names
    }

    /// Display name of the inclusion list, as written by the operator.
    #[must_use]
    pub fn watchlist_name(&self) -> String {
        self.watchlist.to_string_lossy().replace('\\', "/")
    }

    /// Display name of the exclusion list, as written by the operator.
    #[must_use]
    pub fn donotwatchlist_name(&self) -> String {
        self.donotwatchlist.to_string_lossy().replace('\\', "/")
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.watchlist, PathBuf::from(".watchlist"));
        assert_eq!(config.tree_file, PathBuf::from(".cursorrules"));
        assert_eq!(config.event_debounce, Duration::from_millis(100));
        assert_eq!(config.rewrite_debounce, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = Config {
            log_level: "invalid".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log level"));
    }

    #[test]
    fn test_log_level_case_insensitive() {
        for level in ["TRACE", "Debug", "INFO", "Warn", "ERROR"] {
            let config = Config {
                log_level: level.to_string(),
                ..Default::default()
            };
            assert!(
                config.validate().is_ok(),
                "Level '{level}' should be valid (case insensitive)"
            );
        }
    }

    #[test]
    fn test_validate_missing_root() {
        let config = Config::with_root("/nonexistent/project/root");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_validate_empty_file_name() {
        let config = Config {
            tree_file: PathBuf::new(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tree_file"));
    }

    #[test]
    fn test_validate_colliding_files() {
        let config = Config {
            donotwatchlist: PathBuf::from(".watchlist"),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("same file"));
    }

    #[test]
    fn test_paths_join_root() {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());
        assert_eq!(config.watchlist_path(), tmp.path().join(".watchlist"));
        assert_eq!(
            config.donotwatchlist_path(),
            tmp.path().join(".donotwatchlist")
        );
        assert_eq!(config.tree_file_path(), tmp.path().join(".cursorrules"));
    }

    #[test]
    fn test_reserved_names() {
        let config = Config {
            tree_file: PathBuf::from("docs/TREE.md"),
            ..Default::default()
        };
        assert_eq!(
            config.reserved_names(),
            vec![
                ENTRY_POINT_NAME.to_string(),
                ".watchlist".to_string(),
                ".donotwatchlist".to_string(),
                "TREE.md".to_string(),
            ]
        );
    }
}

//! Inclusion and exclusion lists loaded from disk on demand.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;

use super::parse::{normalize_path, parse_entries};

/// Paths eligible for header management, in operator order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionList {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl InclusionList {
    /// Build a list from raw entries, normalizing each path.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|e| normalize_path(e.as_ref()))
            .collect();
        let index = entries.iter().cloned().collect();
        Self { entries, index }
    }

    /// Exact normalized-path membership.
    #[must_use]
    pub fn contains(&self, rel_path: &str) -> bool {
        self.index.contains(rel_path)
    }

    /// Entries in operator order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Distinct entries as a set.
    #[must_use]
    pub fn as_set(&self) -> &HashSet<String> {
        &self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every directory that holds an entry, plus its ancestors.
    ///
    /// The project root is always present, spelled `"."`.
    #[must_use]
    pub fn watched_dirs(&self) -> BTreeSet<String> {
        let mut dirs = BTreeSet::from([".".to_string()]);
        for entry in &self.entries {
            let mut dir = entry.as_str();
            while let Some(idx) = dir.rfind('/') {
                dir = &dir[..idx];
                if dir.is_empty() {
                    break;
                }
                dirs.insert(dir.to_string());
            }
        }
        dirs
    }
}

/// Compiled exclusion patterns. Invalid patterns never make it in.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<Regex>,
}

impl ExclusionSet {
    /// Compile patterns, skipping (and logging) any that fail.
    pub fn compile<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|p| {
                let p = p.as_ref();
                match Regex::new(p) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(pattern = %p, error = %e, "Skipping invalid exclusion pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Whether any pattern matches anywhere in `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    /// Source text of the first pattern matching `text`.
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(text))
            .map(Regex::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Reads the two list files. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct PatternStore {
    watchlist: PathBuf,
    donotwatchlist: PathBuf,
}

impl PatternStore {
    /// Create a store over the given list files.
    pub fn new(watchlist: impl Into<PathBuf>, donotwatchlist: impl Into<PathBuf>) -> Self {
        Self {
            watchlist: watchlist.into(),
            donotwatchlist: donotwatchlist.into(),
        }
    }

    /// Path of the inclusion-list file.
    #[must_use]
    pub fn watchlist_path(&self) -> &Path {
        &self.watchlist
    }

    /// Path of the exclusion-list file.
    #[must_use]
    pub fn donotwatchlist_path(&self) -> &Path {
        &self.donotwatchlist
    }

    /// Raw inclusion entries in file order; empty when the file is absent
    /// or unreadable.
    #[must_use]
    pub fn load_inclusion_list(&self) -> Vec<String> {
        let entries = read_list(&self.watchlist);
        tracing::debug!(count = entries.len(), entries = ?entries, "Loaded inclusion list");
        entries
    }

    /// Raw exclusion patterns in file order; empty when the file is absent
    /// or unreadable.
    #[must_use]
    pub fn load_exclusion_patterns(&self) -> Vec<String> {
        let patterns = read_list(&self.donotwatchlist);
        tracing::debug!(count = patterns.len(), patterns = ?patterns, "Loaded exclusion patterns");
        patterns
    }

    /// The inclusion list as a membership structure.
    #[must_use]
    pub fn inclusion(&self) -> InclusionList {
        InclusionList::from_entries(self.load_inclusion_list())
    }

    /// The exclusion list compiled into matchers.
    #[must_use]
    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::compile(self.load_exclusion_patterns())
    }
}

fn read_list(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(path) {
        Ok(text) => parse_entries(&text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read list file");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> PatternStore {
        PatternStore::new(
            tmp.path().join(".watchlist"),
            tmp.path().join(".donotwatchlist"),
        )
    }

    #[test]
    fn test_missing_files_yield_empty_lists() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.load_inclusion_list().is_empty());
        assert!(store.load_exclusion_patterns().is_empty());
        assert!(store.exclusions().is_empty());
    }

    #[test]
    fn test_load_inclusion_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".watchlist"),
            "# List files to be watched (one per line)\nsrc/app.py  # entry point\nsrc\\util.js\n",
        )
        .unwrap();
        let store = store_in(&tmp);

        assert_eq!(store.load_inclusion_list(), vec!["src/app.py", "src\\util.js"]);

        let inclusion = store.inclusion();
        assert!(inclusion.contains("src/app.py"));
        assert!(inclusion.contains("src/util.js"));
        assert!(!inclusion.contains("src/other.py"));
    }

    #[test]
    fn test_invalid_patterns_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".donotwatchlist"),
            "build/  # outputs\n[unclosed\n.*\\.log$\n",
        )
        .unwrap();
        let exclusions = store_in(&tmp).exclusions();

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.matches("app/build/out.txt"));
        assert!(exclusions.matches("debug.log"));
        assert!(!exclusions.matches("src/app.py"));
        assert_eq!(exclusions.first_match("x/build/y"), Some("build/"));
    }

    #[test]
    fn test_exclusion_search_is_unanchored() {
        let exclusions = ExclusionSet::compile(["secret"]);
        assert!(exclusions.matches("src/my_secret_notes.txt"));
        assert!(!exclusions.matches("src/public.txt"));
    }

    #[test]
    fn test_watched_dirs_include_ancestors() {
        let inclusion = InclusionList::from_entries(["src/core/engine.py", "README.md", "docs/a.md"]);
        let dirs: Vec<String> = inclusion.watched_dirs().into_iter().collect();
        assert_eq!(dirs, vec![".", "docs", "src", "src/core"]);
    }

    #[test]
    fn test_repeated_loads_are_identical() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".watchlist"), "b.py\na.py\nc.py\n").unwrap();
        let store = store_in(&tmp);
        assert_eq!(store.load_inclusion_list(), store.load_inclusion_list());
        assert_eq!(store.inclusion().entries(), ["b.py", "a.py", "c.py"]);
    }
}

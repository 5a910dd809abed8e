//! Project tree rendering.
//!
//! The renderer walks a [`DirSource`] depth-first, sorted by name at each
//! level, and prunes directories that match the exclusion patterns. It is
//! pure over its inputs: the lists are passed in already parsed, and the
//! directory listing comes from the source, so tests can describe a tree in
//! memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::patterns::{ExclusionSet, InclusionList};

/// Directory names that are never rendered.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "__pycache__"];

/// Appended to files that are not in the inclusion list.
pub const UNWATCHED_MARKER: &str = "  # unwatched";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Lists directories relative to some root. `""` is the root itself.
pub trait DirSource {
    fn entries(&self, rel_dir: &str) -> Vec<TreeEntry>;
}

/// Lists a real directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_path(&self, rel_dir: &str) -> PathBuf {
        if rel_dir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel_dir)
        }
    }

    /// Whether `rel_dir` resolves to the same directory as one of its
    /// ancestors, which happens when a symlink points back up the tree.
    fn is_cycle(&self, rel_dir: &str, resolved: &Path) -> bool {
        let mut ancestor = rel_dir;
        while !ancestor.is_empty() {
            ancestor = ancestor.rsplit_once('/').map_or("", |(parent, _)| parent);
            if self
                .dir_path(ancestor)
                .canonicalize()
                .is_ok_and(|p| p == resolved)
            {
                return true;
            }
        }
        false
    }
}

impl DirSource for FsSource {
    fn entries(&self, rel_dir: &str) -> Vec<TreeEntry> {
        let dir = self.dir_path(rel_dir);
        if let Ok(resolved) = dir.canonicalize() {
            if self.is_cycle(rel_dir, &resolved) {
                tracing::debug!(dir = %dir.display(), "Not descending into symlink cycle");
                return Vec::new();
            }
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            match entry {
                // Symlinked directories count as directories.
                Ok(entry) => entries.push(TreeEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: entry.path().is_dir(),
                }),
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                }
            }
        }
        entries
    }
}

/// In-memory directory description, keyed by relative directory path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    dirs: BTreeMap<String, Vec<TreeEntry>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (and any missing parent directories).
    #[must_use]
    pub fn file(mut self, rel_path: &str) -> Self {
        self.insert(rel_path, false);
        self
    }

    /// Add a directory (and any missing parent directories).
    #[must_use]
    pub fn dir(mut self, rel_path: &str) -> Self {
        self.insert(rel_path, true);
        self
    }

    fn insert(&mut self, rel_path: &str, is_dir: bool) {
        let (parent, name) = rel_path.rsplit_once('/').unwrap_or(("", rel_path));
        if !parent.is_empty() {
            self.insert(parent, true);
        }
        let siblings = self.dirs.entry(parent.to_string()).or_default();
        if !siblings.iter().any(|e| e.name == name) {
            siblings.push(TreeEntry {
                name: name.to_string(),
                is_dir,
            });
        }
    }
}

impl DirSource for MemorySource {
    fn entries(&self, rel_dir: &str) -> Vec<TreeEntry> {
        self.dirs.get(rel_dir).cloned().unwrap_or_default()
    }
}

/// Renders a project tree against fixed inclusion/exclusion lists.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer<'a> {
    inclusion: &'a InclusionList,
    exclusions: &'a ExclusionSet,
}

impl<'a> TreeRenderer<'a> {
    #[must_use]
    pub const fn new(inclusion: &'a InclusionList, exclusions: &'a ExclusionSet) -> Self {
        Self {
            inclusion,
            exclusions,
        }
    }

    /// Render the whole tree below the source root, one line per entry.
    #[must_use]
    pub fn render(&self, source: &impl DirSource) -> Vec<String> {
        let mut lines = Vec::new();
        self.render_dir(source, "", "", &mut lines);
        lines
    }

    fn render_dir(
        &self,
        source: &impl DirSource,
        rel_dir: &str,
        prefix: &str,
        lines: &mut Vec<String>,
    ) {
        let mut entries: Vec<(TreeEntry, String)> = source
            .entries(rel_dir)
            .into_iter()
            .filter(|e| !(e.is_dir && SKIPPED_DIRS.contains(&e.name.as_str())))
            .map(|e| {
                let rel_path = if rel_dir.is_empty() {
                    e.name.clone()
                } else {
                    format!("{rel_dir}/{}", e.name)
                };
                (e, rel_path)
            })
            .filter(|(e, rel_path)| !(e.is_dir && self.is_pruned(&e.name, rel_path)))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

        let count = entries.len();
        for (i, (entry, rel_path)) in entries.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };

            if entry.is_dir {
                lines.push(format!("{prefix}{connector}{}", entry.name));
                let child_prefix = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
                self.render_dir(source, &rel_path, &child_prefix, lines);
            } else if self.inclusion.contains(&rel_path) {
                lines.push(format!("{prefix}{connector}{}", entry.name));
            } else {
                lines.push(format!("{prefix}{connector}{}{UNWATCHED_MARKER}", entry.name));
            }
        }
    }

    fn is_pruned(&self, name: &str, rel_path: &str) -> bool {
        let pattern = self
            .exclusions
            .first_match(name)
            .or_else(|| self.exclusions.first_match(rel_path));
        if let Some(pattern) = pattern {
            tracing::debug!(dir = %rel_path, %pattern, "Pruned directory from tree");
            true
        } else {
            false
        }
    }
}

/// Render the tree under `root` on disk.
#[must_use]
pub fn render_tree(root: &Path, inclusion: &InclusionList, exclusions: &ExclusionSet) -> String {
    TreeRenderer::new(inclusion, exclusions)
        .render(&FsSource::new(root))
        .join("\n")
}

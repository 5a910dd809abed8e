//! Pattern store: the operator-maintained inclusion and exclusion lists.
//!
//! Both lists share one line format: one entry per line, `#` comments
//! (whole-line or trailing after whitespace). Inclusion entries are paths
//! relative to the project root; exclusion entries are regular expressions
//! searched (unanchored) against names and relative paths.

mod parse;
mod store;

pub use parse::{normalize_path, parse_entries, parse_line, COMMENT_MARKER};
pub use store::{ExclusionSet, InclusionList, PatternStore};

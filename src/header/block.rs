//! Building, detecting and splicing the managed header block.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

use super::syntax::CommentSyntax;
use crate::{Error, Result};

/// First line of every managed header (inside the comment syntax).
pub const START_MARKER: &str = "=== WATCHER HEADER START ===";
/// Last line of every managed header (inside the comment syntax).
pub const END_MARKER: &str = "=== WATCHER HEADER END ===";
/// Fixed provenance line.
pub const PROVENANCE_LINE: &str = "Managed by file watcher";

/// Compiled header matchers, one per comment syntax.
static HEADER_PATTERNS: Lazy<Mutex<HashMap<CommentSyntax, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Render a header block for `rel_path`.
///
/// The block is: start marker, `File:` line, provenance line, each extra
/// line, end marker, then a blank line. `rel_path` is emitted with forward
/// slashes regardless of how it was passed in.
#[must_use]
pub fn build_header(rel_path: &str, syntax: CommentSyntax, extra: Option<&[String]>) -> String {
    let rel_path = rel_path.replace('\\', "/");
    let mut lines = vec![
        syntax.wrap(START_MARKER),
        syntax.wrap(&format!("File: {rel_path}")),
        syntax.wrap(PROVENANCE_LINE),
    ];
    if let Some(extra) = extra {
        lines.extend(extra.iter().map(|line| syntax.wrap(line)));
    }
    lines.push(syntax.wrap(END_MARKER));
    lines.push(String::new());
    lines.push(String::new());
    lines.join("\n")
}

/// Matcher for a header previously produced by [`build_header`], anchored
/// at the start of the file. The trailing blank line is consumed when
/// present.
///
/// Compiled once per syntax and shared afterwards.
///
/// # Errors
///
/// Returns an error if the assembled pattern does not compile.
pub fn header_pattern(syntax: CommentSyntax) -> Result<Regex> {
    if let Some(pattern) = HEADER_PATTERNS.lock().get(&syntax) {
        return Ok(pattern.clone());
    }
    let pattern = compile_header_pattern(syntax)?;
    HEADER_PATTERNS.lock().insert(syntax, pattern.clone());
    Ok(pattern)
}

fn compile_header_pattern(syntax: CommentSyntax) -> Result<Regex> {
    let start = regex::escape(syntax.prefix);
    let end = regex::escape(syntax.suffix);
    let open = regex::escape(START_MARKER);
    let close = regex::escape(END_MARKER);
    let pattern = format!(
        r"\A{start}{open}{end}\n(?:{start}[^\n]*{end}\n)*{start}{close}{end}(?:\n\n?)?"
    );
    Regex::new(&pattern).map_err(|e| Error::internal(format!("header pattern: {e}")))
}

/// Byte length of the existing header at the start of `content`, if any.
///
/// # Errors
///
/// Returns an error if the header pattern cannot be built.
pub fn existing_header_len(content: &str, syntax: CommentSyntax) -> Result<Option<usize>> {
    Ok(header_pattern(syntax)?.find(content).map(|m| m.end()))
}

/// Produce the new file content: `header` replaces an existing header or
/// is prepended, the body is kept byte-for-byte, and the result ends with
/// exactly one newline.
///
/// # Errors
///
/// Returns an error if the header pattern cannot be built.
pub fn apply_header(content: &str, header: &str, syntax: CommentSyntax) -> Result<String> {
    let body = existing_header_len(content, syntax)?.map_or(content, |len| &content[len..]);
    let mut updated = String::with_capacity(header.len() + body.len() + 1);
    updated.push_str(header);
    updated.push_str(body);
    let trimmed = updated.trim_end_matches('\n').len();
    updated.truncate(trimmed);
    updated.push('\n');
    Ok(updated)
}

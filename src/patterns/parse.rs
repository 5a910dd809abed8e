//! Line-oriented list parsing shared by the inclusion and exclusion lists.

/// Comment marker for whole-line and trailing comments.
pub const COMMENT_MARKER: char = '#';

/// Parse the entries of a list file.
///
/// Each line is trimmed; empty lines and lines starting with `#` are
/// dropped; trailing comments (whitespace followed by `#`, unless the
/// whitespace is escaped with `\`) are stripped. Order is preserved.
#[must_use]
pub fn parse_entries(text: &str) -> Vec<String> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse a single physical line into an entry, if it carries one.
#[must_use]
pub fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        return None;
    }

    let entry = match trailing_comment_start(line) {
        Some(idx) => line[..idx].trim(),
        None => line,
    };

    (!entry.is_empty()).then(|| entry.to_string())
}

/// Byte offset of the first unescaped whitespace run that is followed by `#`.
fn trailing_comment_start(line: &str) -> Option<usize> {
    let mut prev: Option<char> = None;
    for (idx, c) in line.char_indices() {
        if c.is_whitespace() && prev != Some('\\') {
            let rest = line[idx..].trim_start();
            if rest.starts_with(COMMENT_MARKER) {
                return Some(idx);
            }
        }
        prev = Some(c);
    }
    None
}

/// Normalize an operator-written path: forward slashes, no leading `./`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries_strips_comments() {
        let text = "# List files to be watched\n\
                    src/app.py\n\
                    \n\
                    src/lib.js   # the library\n\
                    \t  # indented comment\n\
                    docs/index.md\n";
        assert_eq!(
            parse_entries(text),
            vec!["src/app.py", "src/lib.js", "docs/index.md"]
        );
    }

    #[test]
    fn test_hash_without_whitespace_is_kept() {
        assert_eq!(parse_line("notes#1.txt"), Some("notes#1.txt".to_string()));
    }

    #[test]
    fn test_escaped_whitespace_is_not_a_comment() {
        assert_eq!(
            parse_line(r"build\ #keep"),
            Some(r"build\ #keep".to_string())
        );
        // Only the first whitespace character is escaped.
        assert_eq!(parse_line(r"build\  #cut"), Some(r"build\".to_string()));
    }

    #[test]
    fn test_comment_only_after_trim_yields_nothing() {
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("  # just a comment"), None);
    }

    #[test]
    fn test_patterns_keep_regex_syntax() {
        let text = "secret/.*      # Excludes the secret directory\n.*\\.log$\n";
        assert_eq!(parse_entries(text), vec!["secret/.*", ".*\\.log$"]);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(parse_entries("a.py\r\nb.py # x\r\n"), vec!["a.py", "b.py"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "z.py\na.py\nm.py\n";
        assert_eq!(parse_entries(text), parse_entries(text));
        assert_eq!(parse_entries(text), vec!["z.py", "a.py", "m.py"]);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(r"src\app.py"), "src/app.py");
        assert_eq!(normalize_path("./src/app.py"), "src/app.py");
        assert_eq!(normalize_path("src/app.py"), "src/app.py");
    }
}

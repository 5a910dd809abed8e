//! Comment syntax per file type.

use std::path::Path;

/// Prefix/suffix pair used to turn a line of text into a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentSyntax {
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl CommentSyntax {
    const HASH: Self = Self::new("# ", "");
    const SLASHES: Self = Self::new("// ", "");
    const MARKUP: Self = Self::new("<!-- ", " -->");
    const BLOCK: Self = Self::new("/* ", " */");
    const DASHES: Self = Self::new("-- ", "");

    #[must_use]
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Wrap one line of text.
    #[must_use]
    pub fn wrap(&self, line: &str) -> String {
        format!("{}{line}{}", self.prefix, self.suffix)
    }
}

/// Syntax used when a key has no entry.
pub const DEFAULT_SYNTAX: CommentSyntax = CommentSyntax::HASH;

/// Supported extensions (with leading dot; `""` means no extension).
const EXTENSION_SYNTAX: &[(&str, CommentSyntax)] = &[
    (".py", CommentSyntax::HASH),
    (".js", CommentSyntax::SLASHES),
    (".jsx", CommentSyntax::SLASHES),
    (".ts", CommentSyntax::SLASHES),
    (".tsx", CommentSyntax::SLASHES),
    (".html", CommentSyntax::MARKUP),
    (".xml", CommentSyntax::MARKUP),
    (".md", CommentSyntax::MARKUP),
    (".css", CommentSyntax::BLOCK),
    (".scss", CommentSyntax::BLOCK),
    (".txt", CommentSyntax::HASH),
    (".java", CommentSyntax::SLASHES),
    (".kt", CommentSyntax::SLASHES),
    (".swift", CommentSyntax::SLASHES),
    (".cpp", CommentSyntax::SLASHES),
    (".hpp", CommentSyntax::SLASHES),
    (".c", CommentSyntax::SLASHES),
    (".h", CommentSyntax::SLASHES),
    (".rs", CommentSyntax::SLASHES),
    (".go", CommentSyntax::SLASHES),
    (".sh", CommentSyntax::HASH),
    (".rb", CommentSyntax::HASH),
    (".toml", CommentSyntax::HASH),
    (".yaml", CommentSyntax::HASH),
    (".yml", CommentSyntax::HASH),
    (".sql", CommentSyntax::DASHES),
    ("", CommentSyntax::HASH),
];

/// Files recognised by their whole name rather than their extension.
const NAMED_SYNTAX: &[(&str, CommentSyntax)] = &[(".cursorrules", CommentSyntax::HASH)];

/// Table key for `path`: a named entry, else `.ext`, else `""`.
#[must_use]
pub fn syntax_key(path: &Path) -> String {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if let Some((key, _)) = NAMED_SYNTAX
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            return (*key).to_string();
        }
    }

    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn lookup(key: &str) -> Option<CommentSyntax> {
    EXTENSION_SYNTAX
        .iter()
        .chain(NAMED_SYNTAX)
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, syntax)| *syntax)
}

/// Case-insensitive lookup with a `# ` fallback.
#[must_use]
pub fn comment_syntax_for(key: &str) -> CommentSyntax {
    lookup(key).unwrap_or(DEFAULT_SYNTAX)
}

/// Comment syntax for a file path.
#[must_use]
pub fn comment_syntax_for_path(path: &Path) -> CommentSyntax {
    comment_syntax_for(&syntax_key(path))
}

/// Whether headers may be managed in files like `path`.
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    lookup(&syntax_key(path)).is_some()
}

/// All supported keys, in table order.
pub fn supported_keys() -> impl Iterator<Item = &'static str> {
    EXTENSION_SYNTAX
        .iter()
        .chain(NAMED_SYNTAX)
        .map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_key() {
        assert_eq!(syntax_key(Path::new("src/app.py")), ".py");
        assert_eq!(syntax_key(Path::new("src/App.PY")), ".py");
        assert_eq!(syntax_key(Path::new("Makefile")), "");
        assert_eq!(syntax_key(Path::new(".cursorrules")), ".cursorrules");
        assert_eq!(syntax_key(Path::new("archive.tar.gz")), ".gz");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(comment_syntax_for(".HTML"), CommentSyntax::MARKUP);
        assert_eq!(comment_syntax_for(".Css"), CommentSyntax::BLOCK);
    }

    #[test]
    fn test_unknown_falls_back_to_hash() {
        assert_eq!(comment_syntax_for(".png"), DEFAULT_SYNTAX);
        assert_eq!(DEFAULT_SYNTAX.prefix, "# ");
        assert_eq!(DEFAULT_SYNTAX.suffix, "");
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a.py")));
        assert!(is_supported(Path::new("index.HTML")));
        assert!(is_supported(Path::new("Dockerfile")));
        assert!(is_supported(Path::new(".cursorrules")));
        assert!(!is_supported(Path::new("logo.png")));
        assert!(!is_supported(Path::new("data.json")));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(CommentSyntax::MARKUP.wrap("hi"), "<!-- hi -->");
        assert_eq!(CommentSyntax::SLASHES.wrap(""), "// ");
    }

    #[test]
    fn test_supported_keys_cover_table() {
        let keys: Vec<&str> = supported_keys().collect();
        assert!(keys.contains(&".py"));
        assert!(keys.contains(&""));
        assert!(keys.contains(&".cursorrules"));
    }
}

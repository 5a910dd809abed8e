//! Header engine: the managed comment block at the top of each file.

mod block;
mod syntax;

pub use block::{
    apply_header, build_header, existing_header_len, header_pattern, END_MARKER,
    PROVENANCE_LINE, START_MARKER,
};
pub use syntax::{
    comment_syntax_for, comment_syntax_for_path, is_supported, supported_keys, syntax_key,
    CommentSyntax, DEFAULT_SYNTAX,
};

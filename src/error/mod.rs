//! Error types and Result aliases for headerwatch.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using headerwatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for headerwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// Header rewrite error.
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// The designated tree file is missing and could not be created.
    #[error("tree file '{path}' could not be created: {reason}")]
    TreeFile { path: String, reason: String },

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// File watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Failed to watch path.
    #[error("failed to watch path '{path}': {reason}")]
    WatchFailed { path: String, reason: String },

    /// A watch root was requested before the watcher was started.
    #[error("watcher has not been started")]
    NotStarted,
}

/// Header rewrite errors, always scoped to a single file.
#[derive(Error, Debug)]
pub enum HeaderError {
    /// The file could not be read.
    #[error("failed to read '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The file is not valid UTF-8.
    #[error("'{path}' is not valid UTF-8")]
    Encoding { path: String },

    /// The new content could not be written back.
    #[error("failed to write '{path}': {reason}")]
    Write { path: String, reason: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error must terminate the process.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::TreeFile { .. } | Self::Config(_))
    }
}

impl WatcherError {
    /// Create a watch failure for `path`.
    pub fn watch_failed(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::WatchFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;

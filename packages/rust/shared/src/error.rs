//! Error types for readmepack.
//!
//! Library crates use [`ReadmePackError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all readmepack operations.
#[derive(Debug, thiserror::Error)]
pub enum ReadmePackError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Zip encoding error, or the encoder worker failed to complete.
    #[error("archive error: {0}")]
    Archive(String),

    /// Input that cannot be processed (missing root, unnamed directory, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReadmePackError>;

impl ReadmePackError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an archive error from any displayable message.
    pub fn archive(msg: impl std::fmt::Display) -> Self {
        Self::Archive(msg.to_string())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ReadmePackError::config("version code is required");
        assert_eq!(err.to_string(), "config error: version code is required");

        let err = ReadmePackError::validation("root directory 'docs' does not exist");
        assert!(err.to_string().contains("'docs'"));
    }

    #[test]
    fn io_error_carries_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ReadmePackError::io("/tmp/missing.md", source);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.md"));
        assert!(msg.contains("gone"));
    }
}

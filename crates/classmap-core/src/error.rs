//! Error types for scanning and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a single file cannot be scanned.
#[derive(Debug, Error)]
pub enum ScanError {
    /// File is missing, not a regular file, or unreadable.
    #[error("Invalid/Not readable file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create a file access error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Path of the file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileAccess { path, .. } => path,
        }
    }
}

/// Invalid caller-supplied configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A wrap format string must contain exactly one `%s`.
    #[error("Wrap format must contain exactly one %s specifier, found {found} in {wrap:?}")]
    Placeholder { wrap: String, found: usize },

    /// An exclude-file wildcard could not be compiled.
    #[error("Invalid exclude pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Options rejected by validation.
    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },
}

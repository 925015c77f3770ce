//! Error types for table files and the runtime loader.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading, writing or parsing a class map table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table text does not have the expected shape.
    #[error("Malformed class map table: {message}")]
    Malformed { message: String },
}

impl TableError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Unrecoverable loader failures. Once the table cannot be loaded, no type
/// can be resolved through the loader.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No table path was configured.
    #[error("Couldn't load class map table: no path set ({origin})")]
    Unset { origin: String },

    /// The table could not be read or parsed.
    #[error("Couldn't load class map table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    /// The table parsed but holds no entries.
    #[error("Couldn't load class map table {path}: table is empty")]
    Empty { path: PathBuf },

    /// An earlier load attempt failed.
    #[error("Class map loader unavailable: {reason}")]
    Unavailable { reason: String },

    /// A resolved file could not be included.
    #[error("Couldn't include {path}: {source}")]
    Include {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

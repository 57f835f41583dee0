//! Error types for permfix-db

use std::path::PathBuf;

/// Result type for permfix-db operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the package database
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The local database directory does not exist
    #[error("package database not found at {path}")]
    DatabaseUnavailable { path: PathBuf },

    /// A package descriptor could not be decompressed or parsed
    #[error("corrupt descriptor for {package}: {reason}")]
    CorruptArchive { package: String, reason: String },

    /// A requested package is not present in the database
    #[error("package not installed: {name}")]
    PackageNotFound { name: String },

    /// I/O error while reading the database
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(package: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptArchive {
            package: package.into(),
            reason: reason.into(),
        }
    }
}

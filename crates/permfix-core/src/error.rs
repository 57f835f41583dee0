//! Error types for permfix-core

/// Result type for permfix-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a run.
///
/// Everything recoverable (corrupt descriptors, missing paths, per-entry
/// syscall failures) is folded into the [`crate::RunReport`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from permfix-db
    #[error(transparent)]
    Db(#[from] permfix_db::Error),

    /// A package scope was requested without a database handle
    #[error("package scope requires a database")]
    MissingDatabase,
}

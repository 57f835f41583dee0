//! Error types for permfix-fs

/// Result type for permfix-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur resolving declared ownership.
///
/// Syscall failures stay as `std::io::Error` on the [`crate::FileOps`]
/// methods; the reconciler folds them into per-entry outcomes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared user name has no passwd entry on this system
    #[error("unknown user: {name}")]
    UnknownUser { name: String },

    /// A declared group name has no group entry on this system
    #[error("unknown group: {name}")]
    UnknownGroup { name: String },
}

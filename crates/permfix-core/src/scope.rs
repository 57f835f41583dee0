//! Run selection scope

use std::path::PathBuf;

/// What a run reconciles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every installed package (the default).
    All,
    /// The named packages only.
    Packages(Vec<String>),
    /// Raw filesystem paths, reconciled against the default policy
    /// without consulting the package database.
    Paths(Vec<PathBuf>),
}

impl Scope {
    /// Whether this scope needs the package database at all.
    pub fn needs_database(&self) -> bool {
        !matches!(self, Scope::Paths(_))
    }
}

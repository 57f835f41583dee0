//! Pacman local database reader
//!
//! Reads the package manager's local database directory tree
//! (`<dbpath>/local/<name>-<version>/`) and turns each installed package's
//! descriptor into a list of declared file entries with their expected
//! owner, group and mode.
//!
//! The descriptor format is a versioned external contract owned by pacman.
//! Two schema variants are recognized, enumerated explicitly rather than
//! guessed field-by-field:
//!
//! - the gzip-compressed `mtree` file carrying full attribute data
//! - the plain `files` list carrying paths only (older layouts)

pub mod database;
pub mod desc;
pub mod error;
pub mod files_list;
pub mod model;
pub mod mtree;

pub use database::LocalDatabase;
pub use error::{Error, Result};
pub use model::{DeclaredAttrs, FileEntry, FileKind, OwnerSpec, PackageId, PackageRecord};

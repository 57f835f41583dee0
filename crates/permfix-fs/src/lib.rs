//! Filesystem layer for permfix
//!
//! Everything that touches the live filesystem goes through the
//! [`FileOps`] trait so the reconciler can be tested against a recording
//! double that traps every write call. [`RealFileOps`] is the production
//! implementation: lstat for status, one syscall per corrected attribute.
//!
//! The default attribute policy (applied when a descriptor declares
//! nothing) also lives here, behind a single named function.

pub mod error;
pub mod ops;
pub mod owner;
pub mod policy;
pub mod status;

pub use error::{Error, Result};
pub use ops::{FileOps, RealFileOps};
pub use owner::OwnerResolver;
pub use status::FileStatus;

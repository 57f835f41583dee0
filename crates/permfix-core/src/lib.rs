//! Reconciliation engine for permfix
//!
//! Drives the two halves of the tool: resolve a selection scope into
//! declared file entries through [`permfix_db`], then walk the entries and
//! correct live owner/group/mode drift through the [`permfix_fs::FileOps`]
//! seam. Every entry ends in exactly one terminal outcome; per-entry and
//! per-package failures are folded into the run report instead of aborting
//! the run.

pub mod engine;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod scope;

pub use engine::{RunOptions, run};
pub use error::{Error, Result};
pub use reconcile::Reconciler;
pub use report::{Attribute, Change, EntryReport, Outcome, RunReport, SkippedPackage, Summary};
pub use scope::Scope;

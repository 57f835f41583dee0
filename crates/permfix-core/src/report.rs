//! Run report types
//!
//! Per-entry outcomes and the aggregated summary. All of it serializes to
//! JSON for the `--json` output mode; human formatting lives in the CLI.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One of the three reconciled attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Owner,
    Group,
    Mode,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Owner => "owner",
            Attribute::Group => "group",
            Attribute::Mode => "mode",
        })
    }
}

/// One corrected attribute with its before/after values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub attribute: Attribute,
    pub old: String,
    pub new: String,
}

impl Change {
    pub fn owner(old: u32, new: u32) -> Self {
        Self {
            attribute: Attribute::Owner,
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    pub fn group(old: u32, new: u32) -> Self {
        Self {
            attribute: Attribute::Group,
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    pub fn mode(old: u32, new: u32) -> Self {
        Self {
            attribute: Attribute::Mode,
            old: format!("{old:o}"),
            new: format!("{new:o}"),
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.attribute, self.old, self.new)
    }
}

/// Terminal state of one reconciled entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    /// All three attributes already matched; no syscall issued.
    Unchanged,
    /// At least one attribute was corrected (or would be, on dry runs).
    Corrected { changes: Vec<Change> },
    /// The declared path does not exist on disk. Not an error.
    Missing,
    /// Entry is out of scope for correction (symlinks).
    Skipped { reason: String },
    /// A syscall or lookup failed; processing continued with the next entry.
    Error { message: String },
}

/// Outcome for one declared path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// A package the run could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPackage {
    pub package: String,
    pub reason: String,
}

/// Aggregated counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub unchanged: usize,
    pub corrected: usize,
    pub missing: usize,
    pub skipped: usize,
    pub errors: usize,
    pub packages_processed: usize,
    pub packages_skipped: Vec<SkippedPackage>,
}

impl Summary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Corrected { .. } => self.corrected += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Error { .. } => self.errors += 1,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} corrected, {} unchanged, {} missing, {} skipped, {} errors",
            self.corrected, self.unchanged, self.missing, self.skipped, self.errors
        )?;
        if !self.packages_skipped.is_empty() {
            write!(f, ", {} packages skipped", self.packages_skipped.len())?;
        }
        Ok(())
    }
}

/// Full result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Entries worth a report line: everything except `Unchanged`.
    pub entries: Vec<EntryReport>,
    pub summary: Summary,
}

impl RunReport {
    /// Record one outcome, keeping the entry line for anything that was
    /// not simply in order.
    pub fn record(&mut self, path: PathBuf, outcome: Outcome) {
        self.summary.record(&outcome);
        if !matches!(outcome, Outcome::Unchanged) {
            self.entries.push(EntryReport { path, outcome });
        }
    }

    /// A run is clean when no entry errored and no package was skipped.
    /// Corrections and missing paths do not make a run unclean.
    pub fn is_clean(&self) -> bool {
        self.summary.errors == 0 && self.summary.packages_skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_changes_display_octal() {
        let change = Change::mode(0o644, 0o755);
        assert_eq!(change.to_string(), "mode 644 -> 755");
    }

    #[test]
    fn unchanged_entries_stay_out_of_the_line_report() {
        let mut report = RunReport::default();
        report.record(PathBuf::from("/a"), Outcome::Unchanged);
        report.record(PathBuf::from("/b"), Outcome::Missing);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.summary.unchanged, 1);
        assert_eq!(report.summary.missing, 1);
    }

    #[test]
    fn clean_run_tolerates_corrections_and_missing() {
        let mut report = RunReport::default();
        report.record(
            PathBuf::from("/a"),
            Outcome::Corrected {
                changes: vec![Change::mode(0o644, 0o755)],
            },
        );
        report.record(PathBuf::from("/b"), Outcome::Missing);
        assert!(report.is_clean());

        report.record(
            PathBuf::from("/c"),
            Outcome::Error {
                message: "permission denied".into(),
            },
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn skipped_package_makes_run_unclean() {
        let mut report = RunReport::default();
        report.summary.packages_skipped.push(SkippedPackage {
            package: "bar 1.0-1".into(),
            reason: "corrupt descriptor".into(),
        });
        assert!(!report.is_clean());
    }

    #[test]
    fn summary_line_counts() {
        let summary = Summary {
            corrected: 2,
            unchanged: 10,
            missing: 1,
            ..Default::default()
        };
        assert_eq!(
            summary.to_string(),
            "2 corrected, 10 unchanged, 1 missing, 0 skipped, 0 errors"
        );
    }
}

//! Run driver
//!
//! Resolves a scope to declared entries and reconciles each one, folding
//! per-package and per-entry failures into the run report. Paths already
//! visited in the same run are not revisited (packages can share
//! directories).

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{info, warn};

use permfix_db::{Error as DbError, FileEntry, FileKind, LocalDatabase, PackageId};
use permfix_fs::FileOps;

use crate::error::{Error, Result};
use crate::reconcile::Reconciler;
use crate::report::{RunReport, SkippedPackage};
use crate::scope::Scope;

/// Knobs for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Report what would change without issuing any write call.
    pub dry_run: bool,
}

/// Drive a full reconciliation run.
///
/// `db` is consulted only for package scopes; a
/// [`Scope::Paths`] run never touches the database.
pub fn run<O: FileOps>(
    scope: &Scope,
    db: Option<&LocalDatabase>,
    ops: &O,
    opts: &RunOptions,
) -> Result<RunReport> {
    match scope {
        Scope::Paths(paths) => Ok(run_paths(paths, ops, opts)),
        Scope::All => {
            let db = db.ok_or(Error::MissingDatabase)?;
            let ids = db.list_installed()?;
            Ok(run_packages(db, ids, Vec::new(), ops, opts))
        }
        Scope::Packages(names) => {
            let db = db.ok_or(Error::MissingDatabase)?;
            let mut ids = Vec::new();
            let mut skipped = Vec::new();
            for name in names {
                match db.find_package(name) {
                    Ok(id) => ids.push(id),
                    Err(DbError::PackageNotFound { .. }) => skipped.push(SkippedPackage {
                        package: name.clone(),
                        reason: "not installed".into(),
                    }),
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(run_packages(db, ids, skipped, ops, opts))
        }
    }
}

fn run_packages<O: FileOps>(
    db: &LocalDatabase,
    ids: Vec<PackageId>,
    pre_skipped: Vec<SkippedPackage>,
    ops: &O,
    opts: &RunOptions,
) -> RunReport {
    let mut report = RunReport::default();
    report.summary.packages_skipped = pre_skipped;

    let mut reconciler = Reconciler::new(ops, opts.dry_run);
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let total = ids.len();

    for (i, id) in ids.iter().enumerate() {
        info!("({}/{}) {}", i + 1, total, id);
        let record = match db.load_package_files(id) {
            Ok(record) => record,
            Err(e) => {
                warn!(package = %id, error = %e, "skipping package");
                report.summary.packages_skipped.push(SkippedPackage {
                    package: id.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        report.summary.packages_processed += 1;
        for entry in &record.entries {
            if !visited.insert(entry.path.clone()) {
                continue;
            }
            let outcome = reconciler.reconcile(entry);
            report.record(entry.path.clone(), outcome);
        }
    }

    report
}

fn run_paths<O: FileOps>(paths: &[PathBuf], ops: &O, opts: &RunOptions) -> RunReport {
    let mut report = RunReport::default();
    let mut reconciler = Reconciler::new(ops, opts.dry_run);
    let mut visited: HashSet<PathBuf> = HashSet::new();

    for path in paths {
        if !visited.insert(path.clone()) {
            continue;
        }
        let entry = FileEntry::unattributed(path.clone(), FileKind::File);
        let outcome = reconciler.reconcile(&entry);
        report.record(path.clone(), outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use permfix_fs::RealFileOps;
    use permfix_test_utils::{TestDatabase, current_gid, current_uid};
    use pretty_assertions::assert_eq;

    use crate::report::Outcome;

    /// Fixture declaring entries owned by the test process so no chown is
    /// needed and the suite passes with or without privileges.
    fn install_foo(db: &TestDatabase) {
        db.package("foo", "1.0-1")
            .mtree_set(&format!(
                "type=file uid={} gid={} mode=644",
                current_uid(),
                current_gid()
            ))
            .mtree_entry("./usr", "type=dir mode=755")
            .mtree_entry("./usr/bin", "type=dir mode=755")
            .mtree_entry("./usr/bin/foo", "mode=755")
            .install();
    }

    fn open(db: &TestDatabase) -> LocalDatabase {
        LocalDatabase::open(db.root(), None).unwrap()
    }

    #[test]
    fn corrects_declared_mode_drift() {
        let db = TestDatabase::new();
        install_foo(&db);
        db.write_dir("usr", 0o755);
        db.write_dir("usr/bin", 0o755);
        db.write_file("usr/bin/foo", 0o644);

        let local = open(&db);
        let report = run(
            &Scope::Packages(vec!["foo".into()]),
            Some(&local),
            &RealFileOps,
            &RunOptions::default(),
        )
        .unwrap();

        assert_eq!(report.summary.corrected, 1);
        assert!(report.is_clean());
        assert_eq!(db.mode_of("usr/bin/foo"), 0o755);
    }

    #[test]
    fn second_run_corrects_nothing() {
        let db = TestDatabase::new();
        install_foo(&db);
        db.write_dir("usr", 0o755);
        db.write_dir("usr/bin", 0o755);
        db.write_file("usr/bin/foo", 0o600);

        let local = open(&db);
        let scope = Scope::All;
        let first = run(&scope, Some(&local), &RealFileOps, &RunOptions::default()).unwrap();
        assert_eq!(first.summary.corrected, 1);

        let second = run(&scope, Some(&local), &RealFileOps, &RunOptions::default()).unwrap();
        assert_eq!(second.summary.corrected, 0);
        assert_eq!(second.summary.errors, 0);
    }

    #[test]
    fn corrupt_package_is_skipped_and_others_processed() {
        let db = TestDatabase::new();
        install_foo(&db);
        db.package("bar", "2.0-1").corrupt_mtree().install();
        db.write_dir("usr", 0o755);
        db.write_dir("usr/bin", 0o755);
        db.write_file("usr/bin/foo", 0o755);

        let local = open(&db);
        let report = run(&Scope::All, Some(&local), &RealFileOps, &RunOptions::default()).unwrap();

        assert_eq!(report.summary.packages_processed, 1);
        assert_eq!(report.summary.packages_skipped.len(), 1);
        assert!(report.summary.packages_skipped[0].package.contains("bar"));
        assert!(!report.is_clean());
    }

    #[test]
    fn unknown_package_name_is_recorded_not_fatal() {
        let db = TestDatabase::new();
        install_foo(&db);

        let local = open(&db);
        let report = run(
            &Scope::Packages(vec!["foo".into(), "nope".into()]),
            Some(&local),
            &RealFileOps,
            &RunOptions::default(),
        )
        .unwrap();

        assert_eq!(report.summary.packages_skipped.len(), 1);
        assert_eq!(report.summary.packages_skipped[0].package, "nope");
    }

    #[test]
    fn path_scope_reports_missing_without_database() {
        let report = run(
            &Scope::Paths(vec![PathBuf::from("/definitely/not/a/real/path")]),
            None,
            &RealFileOps,
            &RunOptions::default(),
        )
        .unwrap();

        assert_eq!(report.summary.missing, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn path_scope_matches_policy_default_reconciliation() {
        // A dry run over a real file: the path scope must behave exactly
        // like an unattributed entry under the default policy.
        let db = TestDatabase::new();
        let path = db.write_file("usr/share/doc/readme", 0o600);

        let opts = RunOptions { dry_run: true };
        let report = run(&Scope::Paths(vec![path.clone()]), None, &RealFileOps, &opts).unwrap();

        let entry = &report.entries[0];
        match &entry.outcome {
            Outcome::Corrected { changes } => {
                assert!(changes.iter().any(|c| c.old == "600" && c.new == "644"));
            }
            other => panic!("expected correction, got {other:?}"),
        }
        // Dry run never touched the file.
        assert_eq!(db.mode_of("usr/share/doc/readme"), 0o600);
    }

    #[test]
    fn duplicate_paths_are_visited_once() {
        let db = TestDatabase::new();
        let path = db.write_file("etc/conf", 0o644);

        let report = run(
            &Scope::Paths(vec![path.clone(), path.clone()]),
            None,
            &RealFileOps,
            &RunOptions { dry_run: true },
        )
        .unwrap();

        let total = report.summary.unchanged
            + report.summary.corrected
            + report.summary.missing
            + report.summary.skipped
            + report.summary.errors;
        assert_eq!(total, 1);
    }

    #[test]
    fn symlinks_are_skipped() {
        let db = TestDatabase::new();
        let link = db.write_symlink("usr/lib/libz.so", "libz.so.1");

        let report = run(
            &Scope::Paths(vec![link]),
            None,
            &RealFileOps,
            &RunOptions::default(),
        )
        .unwrap();
        assert_eq!(report.summary.skipped, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn package_scope_without_database_is_an_error() {
        let err = run(&Scope::All, None, &RealFileOps, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingDatabase));
    }
}

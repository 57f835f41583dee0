//! Per-entry reconciliation
//!
//! Compares one declared entry against its live filesystem state and
//! applies the minimal set of corrective syscalls. Attributes that already
//! match are never rewritten, and mode bits a descriptor did not declare
//! (setuid/setgid/sticky under the default policy) are carried over from
//! the live state rather than clobbered.

use permfix_db::{FileEntry, FileKind, OwnerSpec};
use permfix_fs::{FileOps, FileStatus, OwnerResolver, policy};

use crate::report::{Change, Outcome};

/// Attribute values a single entry is driven toward.
#[derive(Debug, Clone, Copy)]
struct Target {
    uid: u32,
    gid: u32,
    mode: u32,
}

/// Reconciles entries through a [`FileOps`] implementation.
pub struct Reconciler<'o, O: FileOps> {
    ops: &'o O,
    resolver: OwnerResolver,
    dry_run: bool,
}

impl<'o, O: FileOps> Reconciler<'o, O> {
    pub fn new(ops: &'o O, dry_run: bool) -> Self {
        Self {
            ops,
            resolver: OwnerResolver::new(),
            dry_run,
        }
    }

    /// Drive one entry to its terminal outcome.
    pub fn reconcile(&mut self, entry: &FileEntry) -> Outcome {
        if entry.kind == FileKind::Symlink {
            return Outcome::Skipped {
                reason: "symlink permissions are not applicable".into(),
            };
        }

        let status = match self.ops.status(&entry.path) {
            Ok(Some(status)) => status,
            Ok(None) => return Outcome::Missing,
            Err(e) => {
                return Outcome::Error {
                    message: e.to_string(),
                };
            }
        };
        // Descriptors without attribute data cannot declare symlinks, so
        // the live kind decides for them.
        if status.kind == FileKind::Symlink {
            return Outcome::Skipped {
                reason: "symlink permissions are not applicable".into(),
            };
        }

        let target = match self.target_for(entry, &status) {
            Ok(target) => target,
            Err(e) => {
                return Outcome::Error {
                    message: e.to_string(),
                };
            }
        };

        let mut changes = Vec::new();
        let mut live_mode = status.mode;

        let want_uid = (target.uid != status.uid).then_some(target.uid);
        let want_gid = (target.gid != status.gid).then_some(target.gid);
        if want_uid.is_some() || want_gid.is_some() {
            if !self.dry_run {
                if let Err(e) = self.ops.set_owner(&entry.path, want_uid, want_gid) {
                    return Outcome::Error {
                        message: e.to_string(),
                    };
                }
                // chown clears setuid/setgid on regular files, so the mode
                // comparison below must see the post-chown state.
                match self.ops.status(&entry.path) {
                    Ok(Some(after)) => live_mode = after.mode,
                    Ok(None) => return Outcome::Missing,
                    Err(e) => {
                        return Outcome::Error {
                            message: e.to_string(),
                        };
                    }
                }
            }
            if let Some(uid) = want_uid {
                changes.push(Change::owner(status.uid, uid));
            }
            if let Some(gid) = want_gid {
                changes.push(Change::group(status.gid, gid));
            }
        }

        if target.mode != live_mode {
            if !self.dry_run {
                if let Err(e) = self.ops.set_mode(&entry.path, target.mode) {
                    return Outcome::Error {
                        message: e.to_string(),
                    };
                }
            }
            changes.push(Change::mode(live_mode, target.mode));
        }

        if changes.is_empty() {
            Outcome::Unchanged
        } else {
            Outcome::Corrected { changes }
        }
    }

    /// Resolve declared attributes (falling back to the default policy
    /// per attribute) into concrete target values.
    ///
    /// A declared mode is authoritative over the full 0o7777 range; a
    /// policy-derived mode only speaks to the 0o777 permission bits, so
    /// live setuid/setgid/sticky bits are preserved.
    fn target_for(&mut self, entry: &FileEntry, status: &FileStatus) -> permfix_fs::Result<Target> {
        let uid = match &entry.attrs.owner {
            Some(OwnerSpec::Id(id)) => *id,
            Some(OwnerSpec::Name(name)) => self.resolver.uid_for(name)?,
            None => policy::DEFAULT_UID,
        };
        let gid = match &entry.attrs.group {
            Some(OwnerSpec::Id(id)) => *id,
            Some(OwnerSpec::Name(name)) => self.resolver.gid_for(name)?,
            None => policy::DEFAULT_GID,
        };
        let mode = match entry.attrs.mode {
            Some(declared) => declared & 0o7777,
            None => {
                let default = policy::default_mode(&entry.path, status.kind);
                (status.mode & !0o777) | (default & 0o777)
            }
        };
        Ok(Target { uid, gid, mode })
    }
}

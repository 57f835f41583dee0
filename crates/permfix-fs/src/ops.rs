//! Filesystem operation seam
//!
//! [`FileOps`] is the boundary the reconciler mutates the system through.
//! Each method maps to a single syscall so corrections stay minimal and
//! interruption can lose at most one attribute change.

use std::fs;
use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use nix::unistd::{Gid, Uid, chown};
use tracing::trace;

use permfix_db::FileKind;

use crate::status::FileStatus;

/// Read and write the attributes of filesystem entries.
pub trait FileOps {
    /// lstat the path. `Ok(None)` when it does not exist.
    fn status(&self, path: &Path) -> io::Result<Option<FileStatus>>;

    /// chmod. `mode` carries permission plus setuid/setgid/sticky bits.
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// chown. `None` leaves that half untouched, keeping the syscall
    /// minimal when only one of owner/group drifted.
    fn set_owner(&self, path: &Path, uid: Option<u32>, gid: Option<u32>) -> io::Result<()>;
}

/// Production [`FileOps`] backed by direct syscalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileOps;

impl FileOps for RealFileOps {
    fn status(&self, path: &Path) -> io::Result<Option<FileStatus>> {
        let md = match fs::symlink_metadata(path) {
            Ok(md) => md,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let ft = md.file_type();
        let kind = if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Dir
        } else {
            FileKind::File
        };
        Ok(Some(FileStatus {
            uid: md.uid(),
            gid: md.gid(),
            mode: md.mode() & 0o7777,
            kind,
        }))
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        trace!("chmod {} {:o}", path.display(), mode);
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    fn set_owner(&self, path: &Path, uid: Option<u32>, gid: Option<u32>) -> io::Result<()> {
        trace!("chown {} {:?} {:?}", path.display(), uid, gid);
        chown(path, uid.map(Uid::from_raw), gid.map(Gid::from_raw)).map_err(io::Error::from)
    }
}

//! Live filesystem status

use permfix_db::FileKind;

/// Snapshot of the attributes permfix cares about for one path.
///
/// `mode` is masked to the permission and setuid/setgid/sticky bits
/// (0o7777); the file-type bits are carried separately as `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStatus {
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub kind: FileKind,
}

//! Default attribute policy
//!
//! Applied when a descriptor declares nothing for an entry (files-list
//! schema, raw path scopes, or partially-attributed mtree entries):
//! root:root ownership, 755 for directories and executable-looking files,
//! 644 for everything else.
//!
//! Executable detection is a path heuristic and deliberately lives in this
//! one function so it can be swapped without touching the reconciler.

use std::path::Path;

use permfix_db::FileKind;

/// Default owner for unattributed entries.
pub const DEFAULT_UID: u32 = 0;
/// Default group for unattributed entries.
pub const DEFAULT_GID: u32 = 0;

/// Default mode class for a path of the given kind.
///
/// Symlink modes are cosmetic on Linux and never corrected; the value
/// returned for them is only ever displayed.
pub fn default_mode(path: &Path, kind: FileKind) -> u32 {
    match kind {
        FileKind::Dir => 0o755,
        FileKind::Symlink => 0o777,
        FileKind::File => {
            if looks_executable(path) {
                0o755
            } else {
                0o644
            }
        }
    }
}

/// Heuristic: a file with no extension under a `bin/`, `sbin/` or `lib*/`
/// segment is assumed executable.
fn looks_executable(path: &Path) -> bool {
    if path.extension().is_some() {
        return false;
    }
    let Some(parent) = path.parent() else {
        return false;
    };
    parent.components().any(|c| {
        let segment = c.as_os_str().to_string_lossy();
        segment == "bin" || segment == "sbin" || segment.starts_with("lib")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn directories_default_to_755() {
        assert_eq!(default_mode(Path::new("/usr/share"), FileKind::Dir), 0o755);
    }

    #[test]
    fn binaries_default_to_755() {
        assert_eq!(
            default_mode(Path::new("/usr/bin/foo"), FileKind::File),
            0o755
        );
        assert_eq!(
            default_mode(Path::new("/usr/sbin/daemon"), FileKind::File),
            0o755
        );
        assert_eq!(
            default_mode(Path::new("/usr/lib64/ld-linux"), FileKind::File),
            0o755
        );
    }

    #[test]
    fn files_with_extensions_default_to_644() {
        assert_eq!(
            default_mode(Path::new("/usr/lib/libz.so"), FileKind::File),
            0o644
        );
        assert_eq!(
            default_mode(Path::new("/usr/bin/helper.sh"), FileKind::File),
            0o644
        );
    }

    #[test]
    fn plain_data_files_default_to_644() {
        assert_eq!(
            default_mode(Path::new("/usr/share/doc/README"), FileKind::File),
            0o644
        );
        assert_eq!(default_mode(Path::new("/etc/hostname"), FileKind::File), 0o644);
    }

    #[test]
    fn symlinks_report_777() {
        assert_eq!(
            default_mode(Path::new("/usr/lib/libz.so.1"), FileKind::Symlink),
            0o777
        );
    }
}

//! Parser for the plain `files` descriptor (older database layouts)
//!
//! A `%FILES%` section of newline-delimited relative paths; directories
//! carry a trailing slash. No attribute fields exist in this schema, so
//! every entry falls back to the default policy at reconcile time.

use std::path::Path;

use crate::model::{FileEntry, FileKind};

/// Parse `files` content into unattributed entries joined onto `root`.
///
/// Sections other than `%FILES%` (e.g. `%BACKUP%`) are ignored.
pub fn parse_files_list(content: &str, root: &Path) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    let mut in_files = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('%') && line.ends_with('%') {
            in_files = line == "%FILES%";
            continue;
        }
        if !in_files {
            continue;
        }

        let (relative, kind) = match line.strip_suffix('/') {
            Some(dir) => (dir, FileKind::Dir),
            None => (line, FileKind::File),
        };
        if relative.is_empty() {
            continue;
        }
        entries.push(FileEntry::unattributed(root.join(relative), kind));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn parses_files_section() {
        let entries = parse_files_list(
            "%FILES%\nusr/\nusr/bin/\nusr/bin/foo\n",
            Path::new("/"),
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, PathBuf::from("/usr"));
        assert_eq!(entries[0].kind, FileKind::Dir);
        assert_eq!(entries[2].path, PathBuf::from("/usr/bin/foo"));
        assert_eq!(entries[2].kind, FileKind::File);
        assert!(entries.iter().all(|e| e.attrs.is_empty()));
    }

    #[test]
    fn backup_section_is_ignored() {
        let entries = parse_files_list(
            "%FILES%\netc/foo.conf\n\n%BACKUP%\netc/foo.conf\td41d8cd98f00b204e9800998ecf8427e\n",
            Path::new("/"),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, PathBuf::from("/etc/foo.conf"));
    }

    #[test]
    fn empty_content_yields_no_entries() {
        assert!(parse_files_list("", Path::new("/")).is_empty());
        assert!(parse_files_list("%FILES%\n", Path::new("/")).is_empty());
    }

    #[test]
    fn entries_joined_onto_custom_root() {
        let entries = parse_files_list("%FILES%\nusr/bin/foo\n", Path::new("/mnt"));
        assert_eq!(entries[0].path, PathBuf::from("/mnt/usr/bin/foo"));
    }
}

//! Data model for declared package contents

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Identity of one installed package (name plus full version string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Database directory name for this package (`<name>-<version>`).
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Kind of filesystem node a descriptor entry declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    File,
    Dir,
    Symlink,
}

/// Owner or group as declared by a descriptor: numeric id or a name that
/// still needs a passwd/group lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OwnerSpec {
    Id(u32),
    Name(String),
}

/// Attributes a descriptor declares for one path.
///
/// Every field is optional because attribute presence is a per-entry
/// property: mixed-schema databases may declare a mode for one entry and
/// nothing for the next. Absent fields fall back to the default policy at
/// reconcile time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclaredAttrs {
    pub owner: Option<OwnerSpec>,
    pub group: Option<OwnerSpec>,
    /// Full mode including setuid/setgid/sticky bits (0o7777 range).
    pub mode: Option<u32>,
}

impl DeclaredAttrs {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.group.is_none() && self.mode.is_none()
    }
}

/// One declared filesystem path belonging to a package.
///
/// Invariant: `path` is absolute (database-relative paths are joined onto
/// the filesystem root when the descriptor is parsed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub kind: FileKind,
    pub attrs: DeclaredAttrs,
}

impl FileEntry {
    /// Entry with no declared attributes, reconciled against the default
    /// policy. Used for the files-list schema and raw path scopes.
    pub fn unattributed(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
            attrs: DeclaredAttrs::default(),
        }
    }
}

/// One installed package and its declared file list, in descriptor order.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub id: PackageId,
    pub entries: Vec<FileEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_id_display_is_name_space_version() {
        let id = PackageId::new("coreutils", "9.4-3");
        assert_eq!(id.to_string(), "coreutils 9.4-3");
    }

    #[test]
    fn package_id_dir_name() {
        let id = PackageId::new("gcc-libs", "13.2.1-3");
        assert_eq!(id.dir_name(), "gcc-libs-13.2.1-3");
    }

    #[test]
    fn empty_attrs_detected() {
        assert!(DeclaredAttrs::default().is_empty());
        let attrs = DeclaredAttrs {
            mode: Some(0o644),
            ..Default::default()
        };
        assert!(!attrs.is_empty());
    }
}

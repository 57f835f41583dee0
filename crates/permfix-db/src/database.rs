//! Local database access
//!
//! The local database lives at `<dbpath>/local`, one directory per
//! installed package named `<name>-<version>`, each holding `desc`,
//! `files` and (on current layouts) a gzip-compressed `mtree`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::desc;
use crate::error::{Error, Result};
use crate::files_list::parse_files_list;
use crate::model::{PackageId, PackageRecord};
use crate::mtree::parse_mtree;

/// Default database location relative to the filesystem root.
pub const DEFAULT_DBPATH: &str = "var/lib/pacman";

/// Handle on a pacman local database.
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    root: PathBuf,
    local_dir: PathBuf,
}

impl LocalDatabase {
    /// Open the database under `root`, using `dbpath` when given and the
    /// standard `<root>/var/lib/pacman` location otherwise.
    pub fn open(root: impl Into<PathBuf>, dbpath: Option<PathBuf>) -> Result<Self> {
        let root = root.into();
        let dbpath = dbpath.unwrap_or_else(|| root.join(DEFAULT_DBPATH));
        let local_dir = dbpath.join("local");

        if !local_dir.is_dir() {
            return Err(Error::DatabaseUnavailable { path: local_dir });
        }

        debug!(local_dir = %local_dir.display(), "opened package database");
        Ok(Self { root, local_dir })
    }

    /// Filesystem root declared file paths are joined onto.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate every installed package, sorted by name.
    ///
    /// Package identity comes from the `desc` file, with the directory
    /// name as a fallback for databases missing or truncating `desc`.
    pub fn list_installed(&self) -> Result<Vec<PackageId>> {
        let dir = std::fs::read_dir(&self.local_dir)
            .map_err(|e| Error::io(&self.local_dir, e))?;

        let mut ids = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| Error::io(&self.local_dir, e))?;
            let path = entry.path();
            if !path.is_dir() {
                // ALPM_DB_VERSION and friends.
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();

            let id = match std::fs::read_to_string(path.join("desc")) {
                Ok(content) => desc::parse_desc(&content),
                Err(_) => None,
            }
            .or_else(|| desc::parse_dir_name(&dir_name));

            match id {
                Some(id) => ids.push(id),
                None => warn!(dir = %dir_name, "skipping unrecognizable database entry"),
            }
        }

        ids.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ids)
    }

    /// Find an installed package by name.
    pub fn find_package(&self, name: &str) -> Result<PackageId> {
        self.list_installed()?
            .into_iter()
            .find(|id| id.name == name)
            .ok_or_else(|| Error::PackageNotFound {
                name: name.to_string(),
            })
    }

    /// Load the declared file list for one package.
    ///
    /// Prefers the mtree schema (full attributes); falls back to the plain
    /// files list on older layouts. Decompression and parse failures are
    /// `CorruptArchive`, recoverable per package.
    pub fn load_package_files(&self, id: &PackageId) -> Result<PackageRecord> {
        let package_dir = self.local_dir.join(id.dir_name());
        let package = id.to_string();

        let mtree_path = package_dir.join("mtree");
        if mtree_path.is_file() {
            debug!(package = %package, "reading mtree descriptor");
            let file = File::open(&mtree_path)
                .map_err(|e| Error::corrupt(&package, e.to_string()))?;
            let reader = BufReader::new(GzDecoder::new(file));
            let entries = parse_mtree(reader, &self.root, &package)?;
            return Ok(PackageRecord {
                id: id.clone(),
                entries,
            });
        }

        let files_path = package_dir.join("files");
        if files_path.is_file() {
            debug!(package = %package, "reading files descriptor");
            let content = std::fs::read_to_string(&files_path)
                .map_err(|e| Error::corrupt(&package, e.to_string()))?;
            return Ok(PackageRecord {
                id: id.clone(),
                entries: parse_files_list(&content, &self.root),
            });
        }

        Err(Error::corrupt(&package, "no mtree or files descriptor"))
    }
}

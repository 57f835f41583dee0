//! Shared test utilities for the permfix workspace.
//!
//! Provides [`TestDatabase`], a builder for fake pacman local databases
//! under a temporary filesystem root, so database parsing, reconciliation
//! and CLI tests all work against the same fixture shape. Dev-dependency
//! only — never published.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

/// Uid of the process running the tests.
pub fn current_uid() -> u32 {
    nix::unistd::getuid().as_raw()
}

/// Gid of the process running the tests.
pub fn current_gid() -> u32 {
    nix::unistd::getgid().as_raw()
}

/// A temporary filesystem root holding a pacman-style local database plus
/// helpers for materializing live files to reconcile against.
///
/// # Example
///
/// ```rust,no_run
/// use permfix_test_utils::TestDatabase;
///
/// let db = TestDatabase::new();
/// db.package("foo", "1.0-1")
///     .mtree_set("type=file uid=0 gid=0 mode=644")
///     .mtree_entry("./usr/bin/foo", "mode=755")
///     .install();
/// db.write_file("usr/bin/foo", 0o644);
/// ```
pub struct TestDatabase {
    temp_dir: TempDir,
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDatabase {
    /// Create a fresh root with an empty `var/lib/pacman/local` database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("var/lib/pacman/local");
        fs::create_dir_all(&local).unwrap();
        fs::write(local.join("ALPM_DB_VERSION"), "9\n").unwrap();
        Self { temp_dir }
    }

    /// Filesystem root (pass as `--root` or to `LocalDatabase::open`).
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Database path under the root (`<root>/var/lib/pacman`).
    pub fn dbpath(&self) -> PathBuf {
        self.root().join("var/lib/pacman")
    }

    /// Start a package fixture. Call [`PackageFixture::install`] to write it.
    pub fn package(&self, name: &str, version: &str) -> PackageFixture<'_> {
        PackageFixture {
            db: self,
            name: name.to_string(),
            version: version.to_string(),
            write_desc: true,
            mtree_lines: Vec::new(),
            files_lines: None,
            corrupt_mtree: false,
            skip_descriptors: false,
        }
    }

    /// Create a live regular file under the root with the given mode.
    pub fn write_file(&self, relative: &str, mode: u32) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"fixture").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    /// Create a live directory under the root with the given mode.
    pub fn write_dir(&self, relative: &str, mode: u32) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    /// Create a live symlink under the root.
    pub fn write_symlink(&self, relative: &str, target: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(target, &path).unwrap();
        path
    }

    /// Mode bits (0o7777 masked) of a live path under the root.
    pub fn mode_of(&self, relative: &str) -> u32 {
        use std::os::unix::fs::MetadataExt;
        let md = fs::symlink_metadata(self.root().join(relative)).unwrap();
        md.mode() & 0o7777
    }
}

/// Builder for one installed-package fixture.
pub struct PackageFixture<'a> {
    db: &'a TestDatabase,
    name: String,
    version: String,
    write_desc: bool,
    mtree_lines: Vec<String>,
    files_lines: Option<Vec<String>>,
    corrupt_mtree: bool,
    skip_descriptors: bool,
}

impl PackageFixture<'_> {
    /// Omit the `desc` file (exercises directory-name fallback).
    pub fn without_desc(mut self) -> Self {
        self.write_desc = false;
        self
    }

    /// Omit every descriptor (no mtree, no files).
    pub fn without_descriptors(mut self) -> Self {
        self.skip_descriptors = true;
        self
    }

    /// Add a `/set` defaults line to the mtree descriptor.
    pub fn mtree_set(mut self, keywords: &str) -> Self {
        self.mtree_lines.push(format!("/set {keywords}"));
        self
    }

    /// Add an entry line to the mtree descriptor.
    pub fn mtree_entry(mut self, path: &str, keywords: &str) -> Self {
        if keywords.is_empty() {
            self.mtree_lines.push(path.to_string());
        } else {
            self.mtree_lines.push(format!("{path} {keywords}"));
        }
        self
    }

    /// Use the plain files-list schema instead of mtree.
    pub fn files(mut self, paths: &[&str]) -> Self {
        self.files_lines = Some(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Write an mtree file that is not valid gzip.
    pub fn corrupt_mtree(mut self) -> Self {
        self.corrupt_mtree = true;
        self
    }

    /// Write the fixture into the database directory.
    pub fn install(self) {
        let dir = self
            .db
            .dbpath()
            .join("local")
            .join(format!("{}-{}", self.name, self.version));
        fs::create_dir_all(&dir).unwrap();

        if self.write_desc {
            let desc = format!(
                "%NAME%\n{}\n\n%VERSION%\n{}\n\n%ARCH%\nx86_64\n",
                self.name, self.version
            );
            fs::write(dir.join("desc"), desc).unwrap();
        }

        if self.skip_descriptors {
            return;
        }

        if self.corrupt_mtree {
            fs::write(dir.join("mtree"), b"this is not gzip data").unwrap();
            return;
        }

        if let Some(files) = self.files_lines {
            let mut content = String::from("%FILES%\n");
            for line in files {
                content.push_str(&line);
                content.push('\n');
            }
            fs::write(dir.join("files"), content).unwrap();
            return;
        }

        let mut text = String::from("#mtree\n");
        for line in &self.mtree_lines {
            text.push_str(line);
            text.push('\n');
        }
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        fs::write(dir.join("mtree"), encoder.finish().unwrap()).unwrap();
    }
}

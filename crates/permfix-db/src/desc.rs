//! Parser for the per-package `desc` file
//!
//! `desc` is a plain-text file of `%SECTION%` headers, each followed by
//! value lines and terminated by a blank line. Only `%NAME%` and
//! `%VERSION%` are of interest here.

use crate::model::PackageId;

/// Extract the package identity from `desc` content.
///
/// Returns `None` when either section is missing or empty, in which case
/// the caller falls back to parsing the database directory name.
pub fn parse_desc(content: &str) -> Option<PackageId> {
    let mut name = None;
    let mut version = None;
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let target = match line.trim() {
            "%NAME%" => &mut name,
            "%VERSION%" => &mut version,
            _ => continue,
        };
        if let Some(value) = lines.next() {
            let value = value.trim();
            if !value.is_empty() {
                *target = Some(value.to_string());
            }
        }
    }

    Some(PackageId::new(name?, version?))
}

/// Recover the package identity from a `<name>-<pkgver>-<pkgrel>` database
/// directory name. Package names may themselves contain dashes, so the
/// version is always the last two dash-separated segments.
pub fn parse_dir_name(dir_name: &str) -> Option<PackageId> {
    let mut parts = dir_name.rsplitn(3, '-');
    let pkgrel = parts.next()?;
    let pkgver = parts.next()?;
    let name = parts.next()?;
    if name.is_empty() || pkgver.is_empty() || pkgrel.is_empty() {
        return None;
    }
    Some(PackageId::new(name, format!("{pkgver}-{pkgrel}")))
}

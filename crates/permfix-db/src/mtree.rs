//! Parser for the gzip-compressed `mtree` descriptor
//!
//! BSD mtree text: a `#mtree` signature line, `/set` lines that establish
//! default attributes for subsequent entries, `/unset` lines that clear
//! them, and one entry line per path (`./usr/bin/foo mode=755 ...`).
//! Per-entry keywords override the current `/set` defaults, so attribute
//! presence is resolved entry by entry.

use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{DeclaredAttrs, FileEntry, FileKind, OwnerSpec};

/// Package-manager bookkeeping entries that never exist on the live
/// filesystem and must not be reconciled.
pub const IGNORED_ENTRIES: &[&str] = &[
    ".PKGINFO",
    ".BUILDINFO",
    ".MTREE",
    ".INSTALL",
    ".CHANGELOG",
];

#[derive(Debug, Clone, Default)]
struct RawAttrs {
    kind: Option<FileKind>,
    owner: Option<OwnerSpec>,
    group: Option<OwnerSpec>,
    mode: Option<u32>,
}

impl RawAttrs {
    /// Apply one `key=value` keyword. Unrecognized keywords (timestamps,
    /// digests, sizes, link targets) are skipped.
    fn apply(&mut self, package: &str, key: &str, value: &str) -> Result<()> {
        match key {
            "type" => {
                self.kind = match value {
                    "file" => Some(FileKind::File),
                    "dir" => Some(FileKind::Dir),
                    "link" => Some(FileKind::Symlink),
                    _ => None,
                };
            }
            "uid" => {
                let id = value
                    .parse::<u32>()
                    .map_err(|_| Error::corrupt(package, format!("invalid uid {value:?}")))?;
                self.owner = Some(OwnerSpec::Id(id));
            }
            "gid" => {
                let id = value
                    .parse::<u32>()
                    .map_err(|_| Error::corrupt(package, format!("invalid gid {value:?}")))?;
                self.group = Some(OwnerSpec::Id(id));
            }
            "uname" => self.owner = Some(OwnerSpec::Name(value.to_string())),
            "gname" => self.group = Some(OwnerSpec::Name(value.to_string())),
            "mode" => {
                let mode = u32::from_str_radix(value, 8)
                    .map_err(|_| Error::corrupt(package, format!("invalid mode {value:?}")))?;
                self.mode = Some(mode & 0o7777);
            }
            _ => {}
        }
        Ok(())
    }

    fn unset(&mut self, key: &str) {
        match key {
            "all" => *self = Self::default(),
            "type" => self.kind = None,
            "uid" | "uname" => self.owner = None,
            "gid" | "gname" => self.group = None,
            "mode" => self.mode = None,
            _ => {}
        }
    }
}

/// Parse mtree text into file entries, with database-relative paths joined
/// onto the filesystem `root`.
///
/// The reader is expected to yield decompressed text; gzip handling lives
/// in the caller so parse tests can feed plain strings.
pub fn parse_mtree<R: BufRead>(reader: R, root: &Path, package: &str) -> Result<Vec<FileEntry>> {
    let mut defaults = RawAttrs::default();
    let mut entries = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| Error::corrupt(package, e.to_string()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let first = match tokens.next() {
            Some(t) => t,
            None => continue,
        };

        if first == "/set" {
            for token in tokens {
                if let Some((key, value)) = token.split_once('=') {
                    defaults.apply(package, key, value)?;
                }
            }
            continue;
        }
        if first == "/unset" {
            for key in tokens {
                defaults.unset(key);
            }
            continue;
        }
        if !first.starts_with("./") && first != "." {
            return Err(Error::corrupt(
                package,
                format!("unrecognized mtree line {line:?}"),
            ));
        }

        let relative = decode_path(first.trim_start_matches("./"), package)?;
        if relative.is_empty() || relative == "." || is_ignored(&relative) {
            continue;
        }

        let mut attrs = defaults.clone();
        for token in tokens {
            if let Some((key, value)) = token.split_once('=') {
                attrs.apply(package, key, value)?;
            }
        }

        entries.push(FileEntry {
            path: root.join(&relative),
            kind: attrs.kind.unwrap_or(FileKind::File),
            attrs: DeclaredAttrs {
                owner: attrs.owner,
                group: attrs.group,
                mode: attrs.mode,
            },
        });
    }

    Ok(entries)
}

fn is_ignored(relative: &str) -> bool {
    IGNORED_ENTRIES.contains(&relative)
}

/// Decode mtree `\ooo` octal escapes (vis(3) encoding of whitespace and
/// other specials in path names).
fn decode_path(raw: &str, package: &str) -> Result<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut bytes = Vec::with_capacity(raw.len());
    let mut chars = raw.bytes().peekable();
    while let Some(b) = chars.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 3 {
            match chars.peek() {
                Some(&d) if (b'0'..=b'7').contains(&d) => {
                    value = value * 8 + u32::from(d - b'0');
                    chars.next();
                    digits += 1;
                }
                _ => break,
            }
        }
        if digits == 0 {
            // Lone backslash, keep it as-is.
            bytes.push(b'\\');
        } else if value > 0o377 {
            // Three digits can spell values past a single byte.
            return Err(Error::corrupt(
                package,
                format!("octal escape out of range in path {raw:?}"),
            ));
        } else {
            bytes.push(value as u8);
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

//! Owner and group name resolution
//!
//! Descriptors usually carry numeric ids, but the mtree schema may use
//! `uname`/`gname`. Lookups go through the passwd/group databases once
//! per name and are cached for the rest of the run.

use std::collections::HashMap;

use nix::unistd::{Group, User};

use crate::error::{Error, Result};

/// Cached passwd/group name resolver.
#[derive(Debug, Default)]
pub struct OwnerResolver {
    users: HashMap<String, Option<u32>>,
    groups: HashMap<String, Option<u32>>,
}

impl OwnerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a user name to its uid.
    pub fn uid_for(&mut self, name: &str) -> Result<u32> {
        if let Some(cached) = self.users.get(name) {
            return cached.ok_or_else(|| Error::UnknownUser {
                name: name.to_string(),
            });
        }
        let uid = User::from_name(name)
            .ok()
            .flatten()
            .map(|u| u.uid.as_raw());
        self.users.insert(name.to_string(), uid);
        uid.ok_or_else(|| Error::UnknownUser {
            name: name.to_string(),
        })
    }

    /// Resolve a group name to its gid.
    pub fn gid_for(&mut self, name: &str) -> Result<u32> {
        if let Some(cached) = self.groups.get(name) {
            return cached.ok_or_else(|| Error::UnknownGroup {
                name: name.to_string(),
            });
        }
        let gid = Group::from_name(name)
            .ok()
            .flatten()
            .map(|g| g.gid.as_raw());
        self.groups.insert(name.to_string(), gid);
        gid.ok_or_else(|| Error::UnknownGroup {
            name: name.to_string(),
        })
    }
}

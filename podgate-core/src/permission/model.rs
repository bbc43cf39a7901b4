//! Permission value types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::credentials::CredentialGroup;

/// A category of operation a permission check is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
    Append,
    Create,
    Delete,
}

impl AccessMode {
    /// Every access mode.
    pub const ALL: [AccessMode; 5] = [
        AccessMode::Read,
        AccessMode::Write,
        AccessMode::Append,
        AccessMode::Create,
        AccessMode::Delete,
    ];
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::Read => write!(f, "read"),
            AccessMode::Write => write!(f, "write"),
            AccessMode::Append => write!(f, "append"),
            AccessMode::Create => write!(f, "create"),
            AccessMode::Delete => write!(f, "delete"),
        }
    }
}

/// An unordered, deduplicated set of access modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessModes(BTreeSet<AccessMode>);

impl AccessModes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed set checked for every ancestor that may be created on the fly.
    pub fn ancestor_creation() -> Self {
        [AccessMode::Append, AccessMode::Create].into_iter().collect()
    }

    pub fn insert(&mut self, mode: AccessMode) -> bool {
        self.0.insert(mode)
    }

    pub fn contains(&self, mode: AccessMode) -> bool {
        self.0.contains(&mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = AccessMode> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether an operation requiring these modes can materialize resources,
    /// and therefore the containers above them.
    pub fn is_create_capable(&self) -> bool {
        self.contains(AccessMode::Create) || self.contains(AccessMode::Append)
    }
}

impl FromIterator<AccessMode> for AccessModes {
    fn from_iter<I: IntoIterator<Item = AccessMode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[AccessMode; N]> for AccessModes {
    fn from(modes: [AccessMode; N]) -> Self {
        modes.into_iter().collect()
    }
}

impl std::fmt::Display for AccessModes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for mode in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", mode)?;
            first = false;
        }
        Ok(())
    }
}

/// Per-mode tri-state judgment for one credential group.
///
/// `Some(true)` grants, `Some(false)` denies and a missing entry means the
/// source has no opinion. A permission without entries is equivalent to no
/// permission at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(BTreeMap<AccessMode, bool>);

impl Permission {
    /// A permission without any opinion.
    pub fn new() -> Self {
        Self::default()
    }

    /// A permission with every mode set to `allow`.
    pub fn all(allow: bool) -> Self {
        AccessMode::ALL.into_iter().map(|mode| (mode, allow)).collect()
    }

    /// Set a mode, builder style.
    pub fn with(mut self, mode: AccessMode, allow: bool) -> Self {
        self.set(mode, allow);
        self
    }

    pub fn set(&mut self, mode: AccessMode, allow: bool) {
        self.0.insert(mode, allow);
    }

    /// The judgment for `mode`, `None` when there is no opinion.
    pub fn get(&self, mode: AccessMode) -> Option<bool> {
        self.0.get(&mode).copied()
    }

    /// Whether `mode` is explicitly granted.
    pub fn allows(&self, mode: AccessMode) -> bool {
        self.get(mode) == Some(true)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AccessMode, bool)> + '_ {
        self.0.iter().map(|(mode, allow)| (*mode, *allow))
    }

    /// Fold another judgment into this one: `false` dominates `true`, which
    /// dominates no opinion.
    pub fn merge(&mut self, other: &Permission) {
        for (mode, incoming) in other.iter() {
            let running = self.0.entry(mode).or_insert(incoming);
            if *running && !incoming {
                *running = false;
            }
        }
    }
}

impl FromIterator<(AccessMode, bool)> for Permission {
    fn from_iter<I: IntoIterator<Item = (AccessMode, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The permission of every credential group the requester holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<CredentialGroup, Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the permission of a group, builder style.
    pub fn with(mut self, group: CredentialGroup, permission: Permission) -> Self {
        self.insert(group, permission);
        self
    }

    pub fn insert(&mut self, group: CredentialGroup, permission: Permission) {
        self.0.insert(group, permission);
    }

    pub fn get(&self, group: CredentialGroup) -> Option<&Permission> {
        self.0.get(&group)
    }

    pub fn groups(&self) -> impl Iterator<Item = CredentialGroup> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CredentialGroup, &Permission)> {
        self.0.iter().map(|(group, permission)| (*group, permission))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any group explicitly grants `mode`.
    pub fn any_allows(&self, mode: AccessMode) -> bool {
        self.0.values().any(|permission| permission.allows(mode))
    }

    /// Fold another permission set into this one, group by group, using
    /// [`Permission::merge`].
    pub fn merge(&mut self, other: &PermissionSet) {
        for (group, permission) in other.iter() {
            self.0.entry(group).or_default().merge(permission);
        }
    }
}

impl FromIterator<(CredentialGroup, Permission)> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = (CredentialGroup, Permission)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

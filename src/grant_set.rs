//! Grant set: the permissions attached to a role
//!
//! Stored ordered and deduplicated. Canonical form: a `(resource, *)` entry
//! excludes every enumerated `(resource, action)` entry for the same
//! resource. The normalizer keeps that form across mutations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RolegateError};
use crate::permission::{Action, Permission, Resource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantSet {
    pub(crate) perms: BTreeSet<Permission>,
}

/// Does `grant` cover the requested permission?
#[inline]
fn covers(grant: &Permission, req: &Permission) -> bool {
    (grant.resource.is_wildcard() || grant.resource == req.resource)
        && (grant.action.is_wildcard() || grant.action == req.action)
}

impl GrantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a permission as-is (no normalization)
    pub fn insert(&mut self, p: Permission) -> bool {
        self.perms.insert(p)
    }

    pub fn remove(&mut self, p: &Permission) -> bool {
        self.perms.remove(p)
    }

    pub fn contains(&self, p: &Permission) -> bool {
        self.perms.contains(p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.perms.iter()
    }

    pub fn len(&self) -> usize {
        self.perms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perms.is_empty()
    }

    /// Is `(resource, *)` present?
    pub fn has_wildcard(&self, resource: &Resource) -> bool {
        self.perms
            .iter()
            .any(|p| &p.resource == resource && p.action.is_wildcard())
    }

    /// Enumerated (non-wildcard) actions held for a resource
    pub fn actions_for(&self, resource: &Resource) -> BTreeSet<&str> {
        self.perms
            .iter()
            .filter(|p| &p.resource == resource && !p.action.is_wildcard())
            .map(|p| p.action.as_str())
            .collect()
    }

    /// Any entry at all for the resource, wildcard included
    pub fn touches(&self, resource: &Resource) -> bool {
        self.perms.iter().any(|p| &p.resource == resource)
    }

    /// Distinct resources mentioned by the set
    pub fn resources(&self) -> BTreeSet<&Resource> {
        self.perms.iter().map(|p| &p.resource).collect()
    }

    /// Drop every entry for a resource, returning how many were removed
    pub fn clear_resource(&mut self, resource: &Resource) -> usize {
        let before = self.perms.len();
        self.perms.retain(|p| &p.resource != resource);
        before - self.perms.len()
    }

    /// Check a single requirement, honoring wildcards on both axes
    pub fn permits(&self, req: &Permission) -> bool {
        self.perms.iter().any(|g| covers(g, req))
    }

    /// `permits` for a (resource, action) pair
    pub fn is_granted(&self, resource: impl Into<Resource>, action: impl Into<Action>) -> bool {
        self.permits(&Permission::new(resource, action))
    }

    /// Check the canonical-form invariant
    pub fn validate(&self) -> Result<()> {
        for r in self.resources() {
            if self.has_wildcard(r) && !self.actions_for(r).is_empty() {
                return Err(RolegateError::InvalidGrantSet(format!(
                    "`{}:*` coexists with enumerated actions",
                    r
                )));
            }
        }
        Ok(())
    }

    /// Wire form: `[{resource, action}]`
    pub fn to_wire(&self) -> Vec<Permission> {
        self.perms.iter().cloned().collect()
    }

    pub fn from_wire(perms: Vec<Permission>) -> Self {
        perms.into_iter().collect()
    }
}

impl FromIterator<Permission> for GrantSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self { perms: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a GrantSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.perms.iter()
    }
}

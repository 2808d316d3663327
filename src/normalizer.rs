//! Wildcard normalizer
//!
//! Keeps a `GrantSet` canonical under checkbox-style mutations: a resource
//! is either held as `(resource, *)` or as enumerated actions, never both.
//! Expansion and collapse use the catalog's declared actions.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::Catalog;
use crate::grant_set::GrantSet;
use crate::permission::{Action, Permission, Resource};

impl GrantSet {
    /// Turn the "all actions" grant for a resource on or off.
    ///
    /// On replaces every enumerated action with `(resource, *)`. Off removes
    /// only the wildcard entry.
    pub fn set_resource_wildcard(&mut self, resource: impl Into<Resource>, on: bool) {
        let resource = resource.into();
        debug!(%resource, on, "set resource wildcard");
        if on {
            self.perms.retain(|p| p.resource != resource);
            self.perms.insert(Permission::wildcard(resource));
        } else {
            self.perms.remove(&Permission::wildcard(resource));
        }
    }

    /// Turn a single action on or off, expanding or collapsing the wildcard as needed
    pub fn set_action(
        &mut self,
        catalog: &Catalog,
        resource: impl Into<Resource>,
        action: impl Into<Action>,
        on: bool,
    ) {
        let resource = resource.into();
        let action = action.into();
        if action.is_wildcard() {
            return self.set_resource_wildcard(resource, on);
        }
        debug!(%resource, %action, on, "set action");

        let wildcard = Permission::wildcard(resource.clone());
        if self.perms.contains(&wildcard) {
            if on {
                return;
            }
            // Unchecking one action under "all" keeps every other catalog action.
            self.perms.remove(&wildcard);
            for a in catalog.actions_for(&resource) {
                if a != action.as_str() {
                    self.perms.insert(Permission::new(resource.clone(), a.as_str()));
                }
            }
        } else if on {
            self.perms.insert(Permission { resource: resource.clone(), action });
        } else {
            self.perms.remove(&Permission { resource: resource.clone(), action });
        }
        self.collapse(catalog, &resource);
    }

    /// Replace a fully enumerated resource with its wildcard. Returns true on collapse.
    pub fn collapse(&mut self, catalog: &Catalog, resource: &Resource) -> bool {
        let full = catalog.actions_for(resource);
        if full.is_empty() || self.has_wildcard(resource) {
            return false;
        }
        let covered = {
            let held = self.actions_for(resource);
            full.iter().all(|a| held.contains(a.as_str()))
        };
        if covered {
            debug!(%resource, "collapse to wildcard");
            self.perms.retain(|p| &p.resource != resource);
            self.perms.insert(Permission::wildcard(resource.clone()));
        }
        covered
    }

    /// Bring an arbitrary set (e.g. one received from the API) into canonical form
    pub fn normalize(&mut self, catalog: &Catalog) {
        let resources: Vec<Resource> = self.resources().into_iter().cloned().collect();
        for r in resources {
            if self.has_wildcard(&r) {
                self.perms.retain(|p| p.resource != r || p.action.is_wildcard());
            } else {
                self.collapse(catalog, &r);
            }
        }
    }

    /// `normalize` by value
    pub fn normalized(mut self, catalog: &Catalog) -> Self {
        self.normalize(catalog);
        self
    }

    /// Enumerated view for display: each resource wildcard replaced by its catalog actions.
    ///
    /// A wildcard on a resource the catalog does not know is kept as-is.
    pub fn expand(&self, catalog: &Catalog) -> BTreeSet<Permission> {
        let mut out = BTreeSet::new();
        for p in &self.perms {
            let actions = catalog.actions_for(&p.resource);
            if p.action.is_wildcard() && !actions.is_empty() {
                out.extend(actions.iter().map(|a| Permission::new(p.resource.clone(), a.as_str())));
            } else {
                out.insert(p.clone());
            }
        }
        out
    }
}

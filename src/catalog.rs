//! Permission catalog: the declared universe of (resource, action) pairs
//!
//! The catalog drives rendering and the normalizer's expand/collapse. It is
//! never consulted for authorization decisions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{SEPARATOR, WILDCARD};
use crate::permission::Resource;

/// Catalog as returned by the API: `{ resources, combinations }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub resources: Vec<String>,
    /// `"resource:action"` strings
    #[serde(default)]
    pub combinations: Vec<String>,
}

/// One resource and the actions declared for it, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub resource: String,
    pub actions: Vec<String>,
}

/// Validated, ordered permission catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build from the API response, skipping malformed combinations
    pub fn from_response(resp: &CatalogResponse) -> Self {
        let mut entries: Vec<CatalogEntry> = Vec::new();
        let mut seen_resources = HashSet::new();
        for r in &resp.resources {
            let r = r.trim();
            if r.is_empty() || r == WILDCARD || !seen_resources.insert(r) {
                continue;
            }
            entries.push(CatalogEntry { resource: r.to_string(), actions: Vec::new() });
        }

        let mut seen = HashSet::new();
        for combo in &resp.combinations {
            let Some((r, a)) = combo.split_once(SEPARATOR) else {
                warn!(combination = %combo, "skipping catalog entry without separator");
                continue;
            };
            let (r, a) = (r.trim(), a.trim());
            if r.is_empty() || a.is_empty() {
                warn!(combination = %combo, "skipping catalog entry with empty side");
                continue;
            }
            if a.contains(SEPARATOR) {
                warn!(combination = %combo, "skipping catalog entry with extra separator");
                continue;
            }
            if a == WILDCARD {
                continue;
            }
            let Some(entry) = entries.iter_mut().find(|e| e.resource == r) else {
                warn!(combination = %combo, resource = r, "skipping catalog entry for undeclared resource");
                continue;
            };
            if seen.insert((r, a)) {
                entry.actions.push(a.to_string());
            }
        }

        entries.retain(|e| !e.actions.is_empty());
        Self { entries }
    }

    /// Build from an optional response; an absent catalog is empty
    pub fn from_optional(resp: Option<&CatalogResponse>) -> Self {
        resp.map(Self::from_response).unwrap_or_default()
    }

    /// Build directly from (resource, actions) pairs
    pub fn from_entries<R, A, I>(entries: impl IntoIterator<Item = (R, I)>) -> Self
    where
        R: Into<String>,
        A: Into<String>,
        I: IntoIterator<Item = A>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(r, actions)| CatalogEntry {
                    resource: r.into(),
                    actions: actions.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared actions for a resource; empty for the wildcard or an unknown resource
    pub fn actions_for(&self, resource: &Resource) -> &[String] {
        match resource {
            Resource::All => &[],
            Resource::Named(r) => self
                .entries
                .iter()
                .find(|e| &e.resource == r)
                .map(|e| e.actions.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn contains(&self, resource: &str, action: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.resource == resource && e.actions.iter().any(|a| a == action))
    }
}

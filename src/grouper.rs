//! Permission grouper: catalog -> per-resource buckets for the role editor

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogResponse};
use crate::labels::Labels;
use crate::permission::Permission;

/// One selectable action inside a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: String,
    /// `resource:action`
    pub id: String,
    pub description: String,
}

/// All actions of one resource, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub resource: String,
    pub label: String,
    pub actions: Vec<ActionEntry>,
}

/// Group a validated catalog
pub fn group_permissions(catalog: &Catalog, labels: &Labels) -> Vec<PermissionGroup> {
    catalog
        .entries()
        .iter()
        .map(|e| PermissionGroup {
            resource: e.resource.clone(),
            label: labels.resource(&e.resource).to_string(),
            actions: e
                .actions
                .iter()
                .map(|a| ActionEntry {
                    action: a.clone(),
                    id: Permission::new(e.resource.as_str(), a.as_str()).to_string(),
                    description: labels.describe(&e.resource, a),
                })
                .collect(),
        })
        .collect()
}

/// Group a raw API response; an absent response yields no groups
pub fn group_response(resp: Option<&CatalogResponse>, labels: &Labels) -> Vec<PermissionGroup> {
    group_permissions(&Catalog::from_optional(resp), labels)
}

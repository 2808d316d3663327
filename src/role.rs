//! Roles and the create/update request body

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RolegateError};
use crate::grant_set::GrantSet;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        RoleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        RoleId(s.to_string())
    }
}

/// A role as read from the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub permissions: GrantSet,
}

impl Role {
    /// Fails for system roles, which the UI must never mutate
    pub fn ensure_mutable(&self) -> Result<()> {
        if self.is_system {
            Err(RolegateError::SystemRole(self.id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Grants in effect for holders of this role; an inactive role grants nothing
    pub fn effective_grants(&self) -> GrantSet {
        if self.is_active { self.permissions.clone() } else { GrantSet::new() }
    }
}

/// Body of role create (POST) and update (PATCH)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: GrantSet,
}

impl From<&Role> for RoleDraft {
    fn from(r: &Role) -> Self {
        Self {
            name: r.name.clone(),
            description: r.description.clone(),
            permissions: r.permissions.clone(),
        }
    }
}

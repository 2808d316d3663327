//! Display labels for resources and actions
//!
//! Static translation tables loaded from JSON:
//! `{ "resources": { "projects": "proyectos" }, "actions": { "read": "Ver" } }`.
//! Missing entries fall back to the raw identifier.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default)]
    pub resources: HashMap<String, String>,
    #[serde(default)]
    pub actions: HashMap<String, String>,
}

impl Labels {
    /// Load translation tables from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn resource<'a>(&'a self, id: &'a str) -> &'a str {
        self.resources.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn action<'a>(&'a self, id: &'a str) -> &'a str {
        self.actions.get(id).map(String::as_str).unwrap_or(id)
    }

    /// "{action} {resource}", e.g. "Ver proyectos"
    pub fn describe(&self, resource: &str, action: &str) -> String {
        format!("{} {}", self.action(action), self.resource(resource))
    }
}

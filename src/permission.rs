//! Permission: the atomic (resource, action) grant
//!
//! Either axis may be the wildcard `*`. On the wire both axes are plain
//! strings, the wildcard transmitted literally.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{SEPARATOR, WILDCARD};
use crate::error::{Result, RolegateError};

/// Resource axis of a permission
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum Resource {
    /// Every resource (super-admin escape hatch)
    All,
    Named(String),
}

/// Action axis of a permission
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum Action {
    /// Every action on the resource
    All,
    Named(String),
}

impl Resource {
    pub fn named(id: impl Into<String>) -> Self {
        Resource::from(id.into())
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Resource::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Resource::All => WILDCARD,
            Resource::Named(s) => s,
        }
    }
}

impl Action {
    pub fn named(id: impl Into<String>) -> Self {
        Action::from(id.into())
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Action::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::All => WILDCARD,
            Action::Named(s) => s,
        }
    }
}

impl From<String> for Resource {
    fn from(s: String) -> Self {
        if s == WILDCARD { Resource::All } else { Resource::Named(s) }
    }
}

impl From<&str> for Resource {
    fn from(s: &str) -> Self {
        Resource::from(s.to_string())
    }
}

impl From<Resource> for String {
    fn from(r: Resource) -> Self {
        match r {
            Resource::All => WILDCARD.to_string(),
            Resource::Named(s) => s,
        }
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        if s == WILDCARD { Action::All } else { Action::Named(s) }
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Action::from(s.to_string())
    }
}

impl From<Action> for String {
    fn from(a: Action) -> Self {
        match a {
            Action::All => WILDCARD.to_string(),
            Action::Named(s) => s,
        }
    }
}

/// Wire axis: trimmed, never empty
fn axis<'de, D: Deserializer<'de>>(d: D, name: &str) -> std::result::Result<String, D::Error> {
    let s = String::deserialize(d)?;
    let t = s.trim();
    if t.is_empty() {
        return Err(D::Error::custom(format!("empty {}", name)));
    }
    if t.contains(SEPARATOR) {
        return Err(D::Error::custom(format!("{} `{}` contains `{}`", name, t, SEPARATOR)));
    }
    Ok(t.to_string())
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        axis(d, "resource").map(Resource::from)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        axis(d, "action").map(Action::from)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (resource, action) grant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub fn new(resource: impl Into<Resource>, action: impl Into<Action>) -> Self {
        Self { resource: resource.into(), action: action.into() }
    }

    /// `(*, *)`: full system access
    pub fn superuser() -> Self {
        Self { resource: Resource::All, action: Action::All }
    }

    /// `(resource, *)`
    pub fn wildcard(resource: impl Into<Resource>) -> Self {
        Self { resource: resource.into(), action: Action::All }
    }

    #[inline]
    pub fn is_superuser(&self) -> bool {
        self.resource.is_wildcard() && self.action.is_wildcard()
    }

    /// Parse the text form `resource:action`
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(SEPARATOR) {
            Some((r, a))
                if !r.trim().is_empty() && !a.trim().is_empty() && !a.contains(SEPARATOR) =>
            {
                Ok(Self::new(r.trim(), a.trim()))
            }
            _ => Err(RolegateError::MalformedPermission(s.to_string())),
        }
    }
}

impl FromStr for Permission {
    type Err = RolegateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.resource, SEPARATOR, self.action)
    }
}

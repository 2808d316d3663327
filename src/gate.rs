//! Authorization gate
//!
//! Decides whether the current grant set satisfies a list of requirements.
//! What the UI does with a denial (hide, fallback, disable) is the caller's
//! configuration, resolved by `Gate::view`.

use serde::{Deserialize, Serialize};

use crate::grant_set::GrantSet;
use crate::permission::Permission;

/// Evaluate requirements against a grant set.
///
/// An empty requirement list is vacuously satisfied, signed in or not.
/// Missing grants deny everything else. `require_all` selects AND over OR.
pub fn authorize(grants: Option<&GrantSet>, requirements: &[Permission], require_all: bool) -> bool {
    if requirements.is_empty() {
        return true;
    }
    let Some(grants) = grants else {
        return false;
    };
    if require_all {
        requirements.iter().all(|r| grants.permits(r))
    } else {
        requirements.iter().any(|r| grants.permits(r))
    }
}

/// What a gated region renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateView {
    Children,
    Fallback,
    Nothing,
    /// Children rendered visually disabled and non-interactive
    Disabled,
}

/// A requirement list plus the caller's presentation choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub requirements: Vec<Permission>,
    pub require_all: bool,
    pub hide_on_unauthorized: bool,
    pub has_fallback: bool,
}

impl Gate {
    pub fn new(requirements: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            requirements: requirements.into_iter().collect(),
            require_all: true,
            hide_on_unauthorized: true,
            has_fallback: false,
        }
    }

    /// Single requirement from its text form
    pub fn parse(requirement: &str) -> crate::error::Result<Self> {
        Ok(Self::new([Permission::parse(requirement)?]))
    }

    pub fn any(mut self) -> Self {
        self.require_all = false;
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    pub fn hide_on_unauthorized(mut self, hide: bool) -> Self {
        self.hide_on_unauthorized = hide;
        self
    }

    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    #[inline]
    pub fn is_authorized(&self, grants: Option<&GrantSet>) -> bool {
        authorize(grants, &self.requirements, self.require_all)
    }

    pub fn view(&self, grants: Option<&GrantSet>) -> GateView {
        match (self.is_authorized(grants), self.hide_on_unauthorized, self.has_fallback) {
            (true, _, _) => GateView::Children,
            (false, true, true) => GateView::Fallback,
            (false, true, false) => GateView::Nothing,
            (false, false, _) => GateView::Disabled,
        }
    }
}

//! Current user and the grant set the gate evaluates against

use serde::{Deserialize, Serialize};

use crate::client::RoleApi;
use crate::error::{Result, RolegateError};
use crate::gate::Gate;
use crate::grant_set::GrantSet;
use crate::role::{Role, RoleId};

/// A user holds exactly one role, referenced by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role_id: RoleId,
}

/// Resolved session: who is signed in and their effective grants
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    grants: Option<GrantSet>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolve a user against their role. A role that does not match the
    /// user's reference, or is inactive, grants nothing.
    pub fn resolve(user: User, role: Option<&Role>) -> Self {
        let grants = match role {
            Some(r) if r.id == user.role_id => r.effective_grants(),
            _ => GrantSet::new(),
        };
        Self { user: Some(user), grants: Some(grants) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// `None` when nobody is signed in
    pub fn grants(&self) -> Option<&GrantSet> {
        self.grants.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn can(&self, gate: &Gate) -> bool {
        gate.is_authorized(self.grants())
    }
}

/// Fetch the signed-in user and their role. A 401 means nobody is signed in.
pub async fn load_session<A: RoleApi + ?Sized>(api: &A) -> Result<Session> {
    let user = match api.current_user().await {
        Ok(u) => u,
        Err(RolegateError::Api { status: 401, .. }) => return Ok(Session::anonymous()),
        Err(e) => return Err(e),
    };
    let role = api.get_role(&user.role_id).await?;
    Ok(Session::resolve(user, Some(&role)))
}

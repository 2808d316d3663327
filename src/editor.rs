//! Role editor session
//!
//! Loads the catalog and (when editing) the role, applies checkbox toggles
//! to a draft grant set through the normalizer, and submits the draft. A
//! failed submission keeps the draft so the user can resubmit; a successful
//! one invalidates cached role and user queries. The role is always read
//! from the API so the baseline is the server's current grant set; only the
//! catalog is served from the cache, within its TTL.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::catalog::{Catalog, CatalogResponse};
use crate::client::RoleApi;
use crate::config::EditPolicy;
use crate::constants::{DEFAULT_CACHE_TTL_SECS, READ_ACTION};
use crate::error::{Result, RolegateError};
use crate::grant_set::GrantSet;
use crate::grouper::{group_permissions, PermissionGroup};
use crate::labels::Labels;
use crate::permission::{Action, Resource};
use crate::role::{Role, RoleDraft, RoleId};
use crate::state::{MutationState, QueryState};

/// State of a resource's group checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCheck {
    Checked,
    Indeterminate,
    Unchecked,
}

pub struct RoleEditor<A: RoleApi> {
    api: A,
    cache: Option<Arc<QueryCache>>,
    cache_ttl: Duration,
    policy: EditPolicy,
    role_id: Option<RoleId>,
    catalog: QueryState<Catalog>,
    /// `Ready(None)` when creating a new role
    role: QueryState<Option<Role>>,
    baseline: RoleDraft,
    draft: RoleDraft,
    submission: MutationState<Role>,
}

impl<A: RoleApi> RoleEditor<A> {
    /// Editor for a new role
    pub fn create(api: A, policy: EditPolicy) -> Self {
        Self {
            api,
            cache: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            policy,
            role_id: None,
            catalog: QueryState::Loading,
            role: QueryState::Loading,
            baseline: RoleDraft::default(),
            draft: RoleDraft::default(),
            submission: MutationState::Idle,
        }
    }

    /// Editor for an existing role
    pub fn edit(api: A, policy: EditPolicy, id: RoleId) -> Self {
        Self { role_id: Some(id), ..Self::create(api, policy) }
    }

    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Max age of a cached catalog
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch catalog and role. Failures are recorded, not returned; see `error`.
    pub async fn load(&mut self) {
        self.catalog = QueryState::Loading;
        self.role = QueryState::Loading;

        self.catalog = QueryState::from_result(self.fetch_catalog().await);
        let role = match self.role_id.clone() {
            Some(id) => self.fetch_role(&id).await.map(Some),
            None => Ok(None),
        };
        self.role = QueryState::from_result(role);

        if let (Some(catalog), Some(role)) = (self.catalog.ready(), self.role.ready()) {
            let mut draft = role.as_ref().map(RoleDraft::from).unwrap_or_default();
            draft.permissions.normalize(catalog);
            self.baseline = draft.clone();
            self.draft = draft;
        }
    }

    /// Reload after a failed load
    pub async fn retry(&mut self) {
        self.load().await
    }

    async fn fetch_catalog(&self) -> Result<Catalog> {
        if let Some(resp) = self.cached_catalog() {
            return Ok(Catalog::from_response(&resp));
        }
        let resp = self.api.fetch_catalog().await?;
        self.store(&QueryKey::Catalog, &resp);
        Ok(Catalog::from_response(&resp))
    }

    async fn fetch_role(&self, id: &RoleId) -> Result<Role> {
        let role = self.api.get_role(id).await?;
        self.store(&QueryKey::Role(id.clone()), &role);
        Ok(role)
    }

    fn cached_catalog(&self) -> Option<CatalogResponse> {
        let cache = self.cache.as_ref()?;
        cache.get_fresh(&QueryKey::Catalog, self.cache_ttl).unwrap_or_else(|e| {
            warn!(error = %e, "cache read failed");
            None
        })
    }

    fn store<T: Serialize>(&self, key: &QueryKey, value: &T) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(key, value) {
                warn!(key = %key.as_key(), error = %e, "cache write failed");
            }
        }
    }

    fn invalidate(&self, id: &RoleId) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate(&QueryKey::after_role_mutation(id)) {
                warn!(%id, error = %e, "cache invalidation failed");
            }
        }
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    pub fn is_ready(&self) -> bool {
        self.catalog.ready().is_some() && self.role.ready().is_some()
    }

    /// First load error, if any
    pub fn error(&self) -> Option<&str> {
        self.catalog.error().or_else(|| self.role.error())
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.ready()
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.ready().and_then(Option::as_ref)
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    pub fn draft(&self) -> &RoleDraft {
        &self.draft
    }

    pub fn grants(&self) -> &GrantSet {
        &self.draft.permissions
    }

    pub fn submission(&self) -> &MutationState<Role> {
        &self.submission
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn is_read_only(&self) -> bool {
        self.role().is_some_and(|r| r.is_system)
    }

    pub fn can_submit(&self) -> bool {
        self.is_ready() && !self.is_read_only() && !self.submission.is_pending()
    }

    /// Grouped catalog for rendering; empty until loaded
    pub fn groups(&self, labels: &Labels) -> Vec<PermissionGroup> {
        self.catalog.ready().map(|c| group_permissions(c, labels)).unwrap_or_default()
    }

    pub fn is_checked(&self, resource: &str, action: &str) -> bool {
        self.draft.permissions.is_granted(resource, action)
    }

    pub fn group_check(&self, resource: &str) -> GroupCheck {
        let r = Resource::from(resource);
        let grants = &self.draft.permissions;
        if grants.has_wildcard(&r) {
            GroupCheck::Checked
        } else if grants.touches(&r) {
            GroupCheck::Indeterminate
        } else {
            GroupCheck::Unchecked
        }
    }

    /// Whether the action's checkbox accepts input under the edit policy
    pub fn is_action_enabled(&self, resource: &str, action: &str) -> bool {
        match self.policy {
            EditPolicy::Independent => true,
            EditPolicy::ReadGatesOthers => {
                action == READ_ACTION
                    || !self.catalog.ready().is_some_and(|c| c.contains(resource, READ_ACTION))
                    || self.is_checked(resource, READ_ACTION)
            }
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Both loads succeeded and the role is not a system role
    fn check_editable(&self) -> Result<()> {
        if self.catalog.ready().is_none() {
            return Err(RolegateError::NotReady("catalog"));
        }
        match &self.role {
            QueryState::Ready(Some(role)) => role.ensure_mutable(),
            QueryState::Ready(None) => Ok(()),
            _ => Err(RolegateError::NotReady("role")),
        }
    }

    /// Toggle one action checkbox
    pub fn toggle_action(&mut self, resource: &str, action: &str, on: bool) -> Result<()> {
        self.check_editable()?;
        if Action::from(action).is_wildcard() {
            return self.toggle_resource(resource, on);
        }
        if on && !self.is_action_enabled(resource, action) {
            return Err(RolegateError::ActionLocked {
                resource: resource.to_string(),
                action: action.to_string(),
            });
        }
        let catalog = self.catalog.ready().ok_or(RolegateError::NotReady("catalog"))?;
        if self.policy == EditPolicy::ReadGatesOthers && action == READ_ACTION && !on {
            self.draft.permissions.clear_resource(&Resource::from(resource));
            return Ok(());
        }
        self.draft.permissions.set_action(catalog, resource, action, on);
        Ok(())
    }

    /// Toggle a resource's group checkbox
    pub fn toggle_resource(&mut self, resource: &str, on: bool) -> Result<()> {
        self.check_editable()?;
        self.draft.permissions.set_resource_wildcard(resource, on);
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.check_editable()?;
        self.draft.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.check_editable()?;
        self.draft.description = description.into();
        Ok(())
    }

    /// Persist the draft. On failure the draft is kept and the error recorded.
    ///
    /// Dropping the returned future before it resolves records the
    /// submission as cancelled, so the editor accepts a new one.
    pub async fn submit(&mut self) -> Result<Role> {
        self.check_editable()?;
        let pending = self.submission.begin_guarded()?;

        let result = match &self.role_id {
            Some(id) => self.api.update_role(id, &self.draft).await,
            None => self.api.create_role(&self.draft).await,
        };

        match result {
            Ok(mut role) => {
                if let Some(catalog) = self.catalog.ready() {
                    role.permissions.normalize(catalog);
                }
                pending.settle(Ok(role.clone()));
                info!(id = %role.id, grants = role.permissions.len(), "role saved");
                self.invalidate(&role.id);
                self.role_id = Some(role.id.clone());
                self.baseline = RoleDraft::from(&role);
                self.draft = self.baseline.clone();
                self.role = QueryState::Ready(Some(role.clone()));
                Ok(role)
            }
            Err(e) => {
                warn!(error = %e, "role submission failed");
                pending.settle(Err(e.to_string()));
                Err(e)
            }
        }
    }
}

/// Flip a role's active flag. System roles are refused before any request.
pub async fn toggle_role_active<A: RoleApi + ?Sized>(
    api: &A,
    cache: Option<&QueryCache>,
    role: &Role,
) -> Result<Role> {
    role.ensure_mutable()?;
    let updated = api.toggle_role_active(&role.id).await?;
    info!(id = %updated.id, active = updated.is_active, "role activation toggled");
    if let Some(cache) = cache {
        cache.invalidate(&QueryKey::after_role_mutation(&updated.id))?;
    }
    Ok(updated)
}

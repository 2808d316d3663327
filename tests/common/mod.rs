//! Shared fixtures: a small catalog and an in-memory RoleApi

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rolegate::{
    Catalog, CatalogResponse, GrantSet, Permission, Result, Role, RoleApi, RoleDraft, RoleId,
    RolegateError, User,
};

pub fn catalog_response() -> CatalogResponse {
    CatalogResponse {
        resources: vec!["projects".into(), "users".into(), "roles".into()],
        combinations: [
            "projects:read",
            "projects:write",
            "projects:delete",
            "users:read",
            "users:manage",
            "roles:read",
            "roles:write",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

pub fn catalog() -> Catalog {
    Catalog::from_response(&catalog_response())
}

/// Grant set from text forms, e.g. `grants(&["projects:read", "users:*"])`
pub fn grants(perms: &[&str]) -> GrantSet {
    perms.iter().map(|p| Permission::parse(p).unwrap()).collect()
}

pub fn role(id: &str, perms: &[&str]) -> Role {
    Role {
        id: RoleId::new(id),
        name: format!("role {}", id),
        description: String::new(),
        is_active: true,
        is_system: false,
        permissions: grants(perms),
    }
}

pub fn system_role(id: &str) -> Role {
    Role { is_system: true, ..role(id, &["*:*"]) }
}

// ============================================================================
// In-memory RoleApi
// ============================================================================

#[derive(Default)]
pub struct FakeApi {
    pub catalog: Mutex<CatalogResponse>,
    pub roles: Mutex<HashMap<RoleId, Role>>,
    pub user: Mutex<Option<User>>,
    pub fail_catalog: AtomicBool,
    pub fail_submit: AtomicBool,
    /// Create/update never resolve
    pub stall_submit: AtomicBool,
    pub catalog_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub toggle_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        *api.catalog.lock().unwrap() = catalog_response();
        api
    }

    pub fn with_role(self, role: Role) -> Self {
        self.roles.lock().unwrap().insert(role.id.clone(), role);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        *self.user.lock().unwrap() = Some(user);
        self
    }

    pub fn stored(&self, id: &str) -> Option<Role> {
        self.roles.lock().unwrap().get(&RoleId::new(id)).cloned()
    }

    fn not_found(id: &RoleId) -> RolegateError {
        RolegateError::Api { status: 404, message: format!("role {} not found", id) }
    }

    async fn check_submit(&self) -> Result<()> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_submit.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(RolegateError::Api { status: 500, message: "database unavailable".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl RoleApi for FakeApi {
    async fn fetch_catalog(&self) -> Result<CatalogResponse> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(RolegateError::Transport("connection refused".into()));
        }
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn get_role(&self, id: &RoleId) -> Result<Role> {
        self.roles.lock().unwrap().get(id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn create_role(&self, draft: &RoleDraft) -> Result<Role> {
        self.check_submit().await?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let role = Role {
            id: RoleId::new(format!("new-{}", n)),
            name: draft.name.clone(),
            description: draft.description.clone(),
            is_active: true,
            is_system: false,
            permissions: draft.permissions.clone(),
        };
        self.roles.lock().unwrap().insert(role.id.clone(), role.clone());
        Ok(role)
    }

    async fn update_role(&self, id: &RoleId, draft: &RoleDraft) -> Result<Role> {
        self.check_submit().await?;
        let mut roles = self.roles.lock().unwrap();
        let role = roles.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        role.name = draft.name.clone();
        role.description = draft.description.clone();
        role.permissions = draft.permissions.clone();
        Ok(role.clone())
    }

    async fn toggle_role_active(&self, id: &RoleId) -> Result<Role> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        let mut roles = self.roles.lock().unwrap();
        let role = roles.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        role.is_active = !role.is_active;
        Ok(role.clone())
    }

    async fn current_user(&self) -> Result<User> {
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or(RolegateError::Api { status: 401, message: "unauthenticated".into() })
    }
}

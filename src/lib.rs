//! Rolegate - role and permission authorization core
//!
//! Permissions are `(resource, action)` pairs, either axis possibly the
//! wildcard `*`. A role's `GrantSet` is kept canonical by the normalizer:
//! `(resource, *)` replaces the enumerated actions it covers, expands back
//! when one of them is unchecked, and reappears once all catalog actions are
//! checked again. The `Gate` evaluates requirement lists against the
//! current session's grants.

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod constants;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod gate;
pub mod grant_set;
pub mod grouper;
pub mod labels;
mod normalizer;
pub mod permission;
pub mod role;
pub mod session;
pub mod state;

pub use cache::{QueryCache, QueryKey};
pub use catalog::{Catalog, CatalogEntry, CatalogResponse};
pub use client::RoleApi;
#[cfg(feature = "client")]
pub use client::HttpRoleApi;
pub use config::{Config, EditPolicy};
pub use constants::{READ_ACTION, SEPARATOR, WILDCARD};
pub use dialog::{DialogSession, DialogStore, Module};
pub use editor::{toggle_role_active, GroupCheck, RoleEditor};
pub use error::{Result, RolegateError};
pub use gate::{authorize, Gate, GateView};
pub use grant_set::GrantSet;
pub use grouper::{group_permissions, group_response, ActionEntry, PermissionGroup};
pub use labels::Labels;
pub use permission::{Action, Permission, Resource};
pub use role::{Role, RoleDraft, RoleId};
pub use session::{load_session, Session, User};
pub use state::{MutationState, PendingGuard, QueryState};

//! Dialog session state, keyed by an enumerated module

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dashboard areas that open dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Projects,
    Deliverables,
    Objectives,
    Activities,
    Services,
    Users,
    Roles,
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Module::Projects => "projects",
            Module::Deliverables => "deliverables",
            Module::Objectives => "objectives",
            Module::Activities => "activities",
            Module::Services => "services",
            Module::Users => "users",
            Module::Roles => "roles",
        };
        f.write_str(s)
    }
}

/// What the single open dialog is doing, and for which record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogSession {
    #[default]
    Closed,
    Create { module: Module },
    Edit { module: Module, id: String },
    View { module: Module, id: String },
    ConfirmToggle { module: Module, id: String },
}

impl DialogSession {
    pub fn module(&self) -> Option<Module> {
        match self {
            DialogSession::Closed => None,
            DialogSession::Create { module }
            | DialogSession::Edit { module, .. }
            | DialogSession::View { module, .. }
            | DialogSession::ConfirmToggle { module, .. } => Some(*module),
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            DialogSession::Edit { id, .. }
            | DialogSession::View { id, .. }
            | DialogSession::ConfirmToggle { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Holds at most one open dialog; opening another replaces it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogStore {
    session: DialogSession,
}

impl DialogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, session: DialogSession) {
        self.session = session;
    }

    pub fn close(&mut self) {
        self.session = DialogSession::Closed;
    }

    pub fn current(&self) -> &DialogSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.session != DialogSession::Closed
    }

    pub fn is_open_for(&self, module: Module) -> bool {
        self.session.module() == Some(module)
    }
}

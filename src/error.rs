//! Error types for Rolegate

use thiserror::Error;

/// The main error type for Rolegate operations
#[derive(Debug, Error)]
pub enum RolegateError {
    #[error("malformed permission `{0}`")]
    MalformedPermission(String),

    #[error("invalid grant set: {0}")]
    InvalidGrantSet(String),

    #[error("role {0} is a system role and cannot be modified")]
    SystemRole(String),

    #[error("`{resource}:{action}` is locked until `{resource}:read` is granted")]
    ActionLocked { resource: String, action: String },

    #[error("{0} is not loaded")]
    NotReady(&'static str),

    #[error("a submission is already in flight")]
    SubmissionPending,

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for Rolegate operations
pub type Result<T> = std::result::Result<T, RolegateError>;

/// Convert a storage error to RolegateError
pub fn err<E: std::error::Error>(e: E) -> RolegateError {
    RolegateError::Cache(e.to_string())
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for RolegateError {
    fn from(e: reqwest::Error) -> Self {
        RolegateError::Transport(e.to_string())
    }
}

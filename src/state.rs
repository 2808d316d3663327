//! Request/response state machines for queries and mutations

use tracing::warn;

use crate::error::{Result, RolegateError};

/// Message recorded when a pending request is dropped before it settles
pub const CANCELLED: &str = "submission cancelled";

/// A fetched value: loading, ready, or failed with a retryable message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            QueryState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn from_result(r: Result<T>) -> Self {
        match r {
            Ok(v) => QueryState::Ready(v),
            Err(e) => QueryState::Failed(e.to_string()),
        }
    }
}

/// idle -> pending -> success | error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MutationState<T> {
    #[default]
    Idle,
    Pending,
    Success(T),
    Error(String),
}

impl<T> MutationState<T> {
    /// Enter `Pending`; refused while a request is already in flight
    pub fn begin(&mut self) -> Result<()> {
        if self.is_pending() {
            return Err(RolegateError::SubmissionPending);
        }
        *self = MutationState::Pending;
        Ok(())
    }

    /// `begin`, returning a guard that records `Error(CANCELLED)` if it is
    /// dropped while still pending. Call `PendingGuard::settle` once the
    /// request has completed.
    pub fn begin_guarded(&mut self) -> Result<PendingGuard<'_, T>> {
        self.begin()?;
        Ok(PendingGuard { state: self })
    }

    pub fn succeed(&mut self, v: T) {
        *self = MutationState::Success(v);
    }

    pub fn fail(&mut self, msg: impl Into<String>) {
        *self = MutationState::Error(msg.into());
    }

    pub fn reset(&mut self) {
        *self = MutationState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MutationState::Error(m) => Some(m),
            _ => None,
        }
    }
}

/// Holds a mutation in `Pending` for the duration of one request
pub struct PendingGuard<'a, T> {
    state: &'a mut MutationState<T>,
}

impl<T> PendingGuard<'_, T> {
    /// The request completed; the caller records its outcome
    pub fn settle(mut self, outcome: std::result::Result<T, String>) {
        match outcome {
            Ok(v) => self.state.succeed(v),
            Err(m) => self.state.fail(m),
        }
    }
}

impl<T> Drop for PendingGuard<'_, T> {
    fn drop(&mut self) {
        if self.state.is_pending() {
            warn!("pending request dropped before completion");
            self.state.fail(CANCELLED);
        }
    }
}

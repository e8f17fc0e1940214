//! Error types for phase hook execution.
//!
//! Store calls fail with [`StoreError`]; the runner wraps those into
//! [`HookError`] together with the phase and object they concern, so a caller
//! only ever has to match on one type.

use thiserror::Error;

/// Failures reported by an [`ObjectStore`](crate::state::ObjectStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    /// The backend could not be reached or rejected the request.
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Coarse classification of a [`HookError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Lookup,
    Create,
    TerminalJobFailure,
}

/// Errors returned by [`HookRunner::run_phase_hooks`](crate::executor::HookRunner::run_phase_hooks).
///
/// Every variant is terminal for the current reconcile tick. Whether the
/// caller retries on the next tick is its own decision.
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook names a cluster other than `source` or `destination`.
    #[error("targetCluster must be 'source' or 'destination'. {0} unknown")]
    InvalidTargetCluster(String),

    /// The playbook text of a playbook hook is not valid base64.
    #[error("playbook of hook {hook} is not valid base64: {source}")]
    InvalidPlaybook {
        hook: String,
        #[source]
        source: base64::DecodeError,
    },

    /// A playbook hook was defined without any playbook text.
    #[error("hook {0} is not custom but defines no playbook")]
    MissingPlaybook(String),

    /// No client is available for the resolved cluster.
    #[error("no client available for {target} cluster: {reason}")]
    ClusterUnavailable { target: String, reason: String },

    #[error("failed to get {what} for phase {phase}: {source}")]
    Lookup {
        phase: String,
        what: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to create {what} for phase {phase}: {source}")]
    Create {
        phase: String,
        what: String,
        #[source]
        source: StoreError,
    },

    /// The hook job exhausted its attempts.
    #[error("Hook job {job} failed.")]
    JobFailed { job: String, failed: i32 },
}

impl HookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HookError::InvalidTargetCluster(_)
            | HookError::InvalidPlaybook { .. }
            | HookError::MissingPlaybook(_)
            | HookError::ClusterUnavailable { .. } => ErrorKind::Configuration,
            HookError::Lookup { .. } => ErrorKind::Lookup,
            HookError::Create { .. } => ErrorKind::Create,
            HookError::JobFailed { .. } => ErrorKind::TerminalJobFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

use thiserror::Error;

/// Domain-level failures. The router converts each of these into a user
/// facing [`Reply`](crate::models::Reply); none of them escape to the
/// transport layer.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Bad input format or a missing required field
    #[error("{0}")]
    Validation(String),

    /// Command requires the admin role
    #[error("access denied")]
    Permission,

    /// Entity does not exist (stale id, concurrent delete)
    #[error("not found: {0}")]
    NotFound(String),

    /// The external executor refused or failed (storage, delivery)
    #[error("executor failure: {0}")]
    Executor(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
    pub fn executor(msg: impl Into<String>) -> Self {
        Self::Executor(msg.into())
    }
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

//! Remote store port holding the serialized mirror of the task set.

use crate::task::domain::Task;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote store operations.
pub type RemoteStoreResult<T> = Result<T, RemoteStoreError>;

/// Remote mirror contract.
///
/// The store never holds a second writable copy: reads return the whole set
/// and writes replace it wholesale.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Reads the full task set.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError::Connection`] when the store cannot be
    /// reached, [`RemoteStoreError::Rejected`] when it reports an error, and
    /// [`RemoteStoreError::Parse`] when its reply is malformed.
    async fn load(&self) -> RemoteStoreResult<Vec<Task>>;

    /// Replaces the remote mirror with `tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError`] when the write fails.
    async fn save(&self, tasks: &[Task]) -> RemoteStoreResult<()>;
}

/// Errors returned by remote store implementations.
#[derive(Debug, Clone, Error)]
pub enum RemoteStoreError {
    /// Transport-level failure. Retryable.
    #[error("connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// The store answered with an explicit error.
    #[error("remote store rejected the request: {0}")]
    Rejected(String),

    /// The reply could not be decoded into tasks.
    #[error("malformed remote payload: {0}")]
    Parse(String),
}

impl RemoteStoreError {
    /// Wraps a transport error.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Returns `true` when retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

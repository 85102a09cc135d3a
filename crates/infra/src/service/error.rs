use thiserror::Error;

use dashgate_core::DomainError;

use crate::service::ValidationError;
use crate::store::StoreError;

/// Error returned by entity services to the transport layer.
///
/// - `BadRequest` / `Validation`: caller-caused, message surfaced verbatim
/// - `NotFound`: primary-key lookup missed
/// - `Conflict`: an entity with the same `(project, name)` already exists
/// - `Store`: infrastructure failure; the message stays opaque
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("internal store failure")]
    Store(#[source] StoreError),
}

impl ServiceError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Whether the failure was caused by the caller.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Store(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { .. } => ServiceError::NotFound(value.to_string()),
            StoreError::AlreadyExists { .. } => ServiceError::Conflict(value.to_string()),
            other => ServiceError::Store(other),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        ServiceError::BadRequest(value.to_string())
    }
}

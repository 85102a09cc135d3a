use std::sync::Arc;

use thiserror::Error;

use dashgate_auth::User;
use dashgate_core::{Entity, EntityKind};

use crate::store::Query;

/// Entity store operation error.
///
/// `NotFound` is the only variant callers are expected to branch on; every
/// other variant is an infrastructure failure, fatal to the calling operation.
/// Timeouts and cancellations coming from the caller's context are surfaced as
/// they are, never retried here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: EntityKind, key: String },

    #[error("{kind} '{key}' already exists")]
    AlreadyExists { kind: EntityKind, key: String },

    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error("store operation timed out: {0}")]
    Timeout(String),

    #[error("store operation cancelled: {0}")]
    Cancelled(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, project: &str, name: &str) -> Self {
        Self::NotFound {
            kind,
            key: entity_key(project, name),
        }
    }

    pub fn already_exists(kind: EntityKind, project: &str, name: &str) -> Self {
        Self::AlreadyExists {
            kind,
            key: entity_key(project, name),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Human-readable key: `project/name`, or `name` for global entities.
pub fn entity_key(project: &str, name: &str) -> String {
    if project.is_empty() {
        name.to_string()
    } else {
        format!("{project}/{name}")
    }
}

/// Narrow persistence contract for entities keyed by `(project, name)`.
///
/// Implementations perform no validation. `get`, `update` and `delete` fail
/// with [`StoreError::NotFound`] when the key is absent; `create` fails with
/// [`StoreError::AlreadyExists`] when it is present.
pub trait EntityStore<E: Entity>: Send + Sync {
    fn create(&self, entity: E) -> Result<E, StoreError>;

    fn get(&self, project: &str, name: &str) -> Result<E, StoreError>;

    fn update(&self, entity: E) -> Result<E, StoreError>;

    fn delete(&self, project: &str, name: &str) -> Result<(), StoreError>;

    fn list(&self, query: &Query) -> Result<Vec<E>, StoreError>;
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn create(&self, entity: E) -> Result<E, StoreError> {
        (**self).create(entity)
    }

    fn get(&self, project: &str, name: &str) -> Result<E, StoreError> {
        (**self).get(project, name)
    }

    fn update(&self, entity: E) -> Result<E, StoreError> {
        (**self).update(entity)
    }

    fn delete(&self, project: &str, name: &str) -> Result<(), StoreError> {
        (**self).delete(project, name)
    }

    fn list(&self, query: &Query) -> Result<Vec<E>, StoreError> {
        (**self).list(query)
    }
}

/// Users are global; their key is the login.
pub trait UserStore: EntityStore<User> {
    fn get_user(&self, login: &str) -> Result<User, StoreError> {
        self.get("", login)
    }
}

impl<S> UserStore for S where S: EntityStore<User> + ?Sized {}

/// Shared, type-erased store handle.
pub type SharedStore<E> = Arc<dyn EntityStore<E>>;

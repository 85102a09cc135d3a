//! Infrastructure layer: entity store, permission cache, services, sessions.
//!
//! Everything here talks to an [`store::EntityStore`]; nothing here knows
//! about HTTP.

pub mod rbac;
pub mod service;
pub mod session;
pub mod store;


#[cfg(test)]
pub(crate) mod testing;

pub use rbac::{CacheState, PermissionResolver, PermissionSnapshot, RefreshError};
pub use service::{
    bind_to_project, EntityServices, ReferentialValidator, RoleBindingService, RoleService, ServiceError, UserService,
    ValidationError,
};
pub use session::{AuthError, SessionIssuer, INVALID_CREDENTIALS};
pub use store::{EntityStore, InMemoryEntityStore, Query, SharedStore, StoreError, UserStore};

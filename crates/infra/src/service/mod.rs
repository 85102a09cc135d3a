//! Entity services: validation, persistence and cache refresh.
//!
//! Every mutation follows the same two-phase contract:
//!
//! 1. validate + persist: may fail the caller with a [`ServiceError`]
//! 2. refresh the permission cache: best-effort, a [`RefreshError`] only
//!    reaches the log and never the caller
//!
//! Between phase 1 and a successful phase 2 resolved permissions may lag the
//! store. That window is expected.
//!
//! [`RefreshError`]: crate::rbac::RefreshError

pub mod dispatch;
pub mod error;
pub mod role;
pub mod rolebinding;
pub mod user;
pub mod validate;

pub use dispatch::EntityServices;
pub use error::ServiceError;
pub use role::RoleService;
pub use rolebinding::RoleBindingService;
pub use user::UserService;
pub use validate::{ReferentialValidator, ValidationError};

use tracing::{debug, error};

use dashgate_core::{validate_name, EntityKind, Metadata};

use crate::rbac::PermissionResolver;

/// Phase 2 of a mutation. Failures are logged, never returned.
pub(crate) fn refresh_after(resolver: &PermissionResolver, kind: EntityKind, op: &'static str) {
    if let Err(err) = resolver.refresh() {
        error!(
            kind = %kind,
            op,
            error = %err,
            "permission cache refresh failed; serving previous snapshot"
        );
    }
}

/// Validate the identity of an entity about to be created.
pub(crate) fn check_new_identity(metadata: &Metadata) -> Result<(), ServiceError> {
    validate_name(&metadata.name)?;
    if !metadata.project.is_empty() {
        validate_name(&metadata.project)?;
    }
    Ok(())
}

/// Reconcile the identity in an update body with the one in the request path.
///
/// The name must match. An empty project is defaulted to the path's project;
/// a non-empty one must match it.
pub(crate) fn check_route_identity(
    metadata: &mut Metadata,
    route_project: &str,
    route_name: &str,
) -> Result<(), ServiceError> {
    if metadata.name != route_name {
        debug!(body = %metadata.name, path = %route_name, "name mismatch on update");
        return Err(ServiceError::bad_request(
            "metadata.name and the name in the http path request don't match",
        ));
    }
    bind_to_project(metadata, route_project)
}

/// Default an empty body project to `route_project`; reject a different one.
pub fn bind_to_project(metadata: &mut Metadata, route_project: &str) -> Result<(), ServiceError> {
    if metadata.project.is_empty() {
        metadata.project = route_project.to_string();
    } else if metadata.project != route_project {
        debug!(body = %metadata.project, path = %route_project, "project mismatch");
        return Err(ServiceError::bad_request(
            "metadata.project and the project name in the http path request don't match",
        ));
    }
    Ok(())
}

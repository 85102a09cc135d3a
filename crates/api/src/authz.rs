//! API-side authorization guard for entity routes.
//!
//! Permissions come from the permission cache snapshot, so a grant or a
//! revocation takes effect on the next request after a successful refresh.

use axum::http::StatusCode;
use tracing::debug;

use dashgate_auth::{authorize, Action, AuthzError, RequiredPermission};
use dashgate_core::EntityKind;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Check that the caller may perform `action` on `kind` in `project`.
pub fn authorize_entity(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    action: Action,
    kind: EntityKind,
) -> Result<(), AuthzError> {
    let permissions = services.entities.resolver().resolve(principal.login());
    authorize(&permissions, &RequiredPermission::new(project, action, kind.as_str())).inspect_err(|e| {
        debug!(login = principal.login(), project, error = %e, "request denied");
    })
}

/// Same as [`authorize_entity`], rendered as a 403 response on failure.
pub fn require(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    action: Action,
    kind: EntityKind,
) -> Result<(), axum::response::Response> {
    authorize_entity(services, principal, project, action, kind)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}

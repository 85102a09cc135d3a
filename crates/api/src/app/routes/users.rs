//! User routes. Users are global, so every check runs against the empty project.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dashgate_auth::{Action, AnyEntity};
use dashgate_core::EntityKind;

use crate::app::routes::common::entity_body;
use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:login", get(get_user).delete(delete_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&services, &principal, "", Action::Read, EntityKind::User) {
        return denied;
    }
    match services.entities.users.list(&params.into_query(None)) {
        Ok(items) => (StatusCode::OK, Json(dto::ListResponse { items })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /api/v1/users - the response never carries the password hash
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&services, &principal, "", Action::Create, EntityKind::User) {
        return denied;
    }
    let entity = match entity_body(body) {
        Ok(entity) => entity,
        Err(resp) => return resp,
    };
    match services.entities.users.create_entity(entity) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(login): Path<String>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&services, &principal, "", Action::Read, EntityKind::User) {
        return denied;
    }
    match services.entities.users.get(&login) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(login): Path<String>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&services, &principal, "", Action::Delete, EntityKind::User) {
        return denied;
    }
    match services.entities.users.delete(&login) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

//! Routes for project-scoped entities (roles and role bindings).
//!
//! Each kind is served twice: under `/projects/:project/<kind>s` and under
//! `/global<kind>s`, where the project is empty.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use dashgate_auth::{Action, AnyEntity, Role, RoleBinding};
use dashgate_core::EntityKind;
use dashgate_infra::{RoleBindingService, RoleService, ServiceError};

use crate::app::routes::common::entity_body;
use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

/// Entity service addressed by `(project, name)`.
pub trait ScopedService: Send + Sync + 'static {
    type Entity: Serialize;

    const KIND: EntityKind;

    fn of(services: &AppServices) -> &Self;

    fn list(&self, query: &dashgate_infra::Query) -> Result<Vec<Self::Entity>, ServiceError>;

    fn get(&self, project: &str, name: &str) -> Result<Self::Entity, ServiceError>;

    fn create_entity(&self, entity: AnyEntity, project: &str) -> Result<Self::Entity, ServiceError>;

    fn update_entity(&self, entity: AnyEntity, project: &str, name: &str) -> Result<Self::Entity, ServiceError>;

    fn delete(&self, project: &str, name: &str) -> Result<(), ServiceError>;
}

macro_rules! impl_scoped_service {
    ($service:ty, $entity:ty, $kind:expr, $field:ident) => {
        impl ScopedService for $service {
            type Entity = $entity;

            const KIND: EntityKind = $kind;

            fn of(services: &AppServices) -> &Self {
                &services.entities.$field
            }

            fn list(&self, query: &dashgate_infra::Query) -> Result<Vec<$entity>, ServiceError> {
                <$service>::list(self, query)
            }

            fn get(&self, project: &str, name: &str) -> Result<$entity, ServiceError> {
                <$service>::get(self, project, name)
            }

            fn create_entity(&self, entity: AnyEntity, project: &str) -> Result<$entity, ServiceError> {
                <$service>::create_entity(self, entity, project)
            }

            fn update_entity(&self, entity: AnyEntity, project: &str, name: &str) -> Result<$entity, ServiceError> {
                <$service>::update_entity(self, entity, project, name)
            }

            fn delete(&self, project: &str, name: &str) -> Result<(), ServiceError> {
                <$service>::delete(self, project, name)
            }
        }
    };
}

impl_scoped_service!(RoleService, Role, EntityKind::Role, roles);
impl_scoped_service!(RoleBindingService, RoleBinding, EntityKind::RoleBinding, bindings);

// ─────────────────────────────────────────────────────────────────────────────
// Routers
// ─────────────────────────────────────────────────────────────────────────────

/// Mounted under `/projects/:project/<kind>s`.
pub fn project_router<S: ScopedService>() -> Router {
    Router::new()
        .route("/", get(list_in_project::<S>).post(create_in_project::<S>))
        .route(
            "/:name",
            get(get_in_project::<S>)
                .put(update_in_project::<S>)
                .delete(delete_in_project::<S>),
        )
}

/// Mounted under `/global<kind>s`.
pub fn global_router<S: ScopedService>() -> Router {
    Router::new()
        .route("/", get(list_global::<S>).post(create_global::<S>))
        .route(
            "/:name",
            get(get_global::<S>).put(update_global::<S>).delete(delete_global::<S>),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Project-scoped handlers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_in_project<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(project): Path<String>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    list::<S>(&services, &principal, &project, params)
}

pub async fn create_in_project<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(project): Path<String>,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    create::<S>(&services, &principal, &project, body)
}

pub async fn get_in_project<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((project, name)): Path<(String, String)>,
) -> axum::response::Response {
    get_one::<S>(&services, &principal, &project, &name)
}

pub async fn update_in_project<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((project, name)): Path<(String, String)>,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    update::<S>(&services, &principal, &project, &name, body)
}

pub async fn delete_in_project<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((project, name)): Path<(String, String)>,
) -> axum::response::Response {
    delete::<S>(&services, &principal, &project, &name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Global handlers (empty project)
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_global<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    list::<S>(&services, &principal, "", params)
}

pub async fn create_global<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    create::<S>(&services, &principal, "", body)
}

pub async fn get_global<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    get_one::<S>(&services, &principal, "", &name)
}

pub async fn update_global<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    update::<S>(&services, &principal, "", &name, body)
}

pub async fn delete_global<S: ScopedService>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    delete::<S>(&services, &principal, "", &name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

fn list<S: ScopedService>(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    params: dto::ListParams,
) -> axum::response::Response {
    if let Err(denied) = authz::require(services, principal, project, Action::Read, S::KIND) {
        return denied;
    }
    match S::of(services).list(&params.into_query(Some(project))) {
        Ok(items) => (StatusCode::OK, Json(dto::ListResponse { items })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn create<S: ScopedService>(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(services, principal, project, Action::Create, S::KIND) {
        return denied;
    }
    let entity = match entity_body(body) {
        Ok(entity) => entity,
        Err(resp) => return resp,
    };
    match S::of(services).create_entity(entity, project) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn get_one<S: ScopedService>(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    name: &str,
) -> axum::response::Response {
    if let Err(denied) = authz::require(services, principal, project, Action::Read, S::KIND) {
        return denied;
    }
    match S::of(services).get(project, name) {
        Ok(entity) => (StatusCode::OK, Json(entity)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn update<S: ScopedService>(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    name: &str,
    body: Result<Json<AnyEntity>, JsonRejection>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(services, principal, project, Action::Update, S::KIND) {
        return denied;
    }
    let entity = match entity_body(body) {
        Ok(entity) => entity,
        Err(resp) => return resp,
    };
    match S::of(services).update_entity(entity, project, name) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn delete<S: ScopedService>(
    services: &AppServices,
    principal: &PrincipalContext,
    project: &str,
    name: &str,
) -> axum::response::Response {
    if let Err(denied) = authz::require(services, principal, project, Action::Delete, S::KIND) {
        return denied;
    }
    match S::of(services).delete(project, name) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

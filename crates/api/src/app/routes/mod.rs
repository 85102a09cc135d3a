use axum::{routing::get, Router};

use dashgate_infra::{RoleBindingService, RoleService};

pub mod auth;
pub mod common;
pub mod scoped;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints, mounted under `/api/v1`.
pub fn router() -> Router {
    Router::new()
        .route("/me/permissions", get(system::my_permissions))
        .nest("/projects/:project/roles", scoped::project_router::<RoleService>())
        .nest("/projects/:project/rolebindings", scoped::project_router::<RoleBindingService>())
        .nest("/globalroles", scoped::global_router::<RoleService>())
        .nest("/globalrolebindings", scoped::global_router::<RoleBindingService>())
        .nest("/users", users::router())
}

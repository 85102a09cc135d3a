use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::{dto, services::AppServices};
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/v1/me/permissions - resolved permissions of the caller
pub async fn my_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let permissions = services.entities.resolver().resolve(principal.login());
    (
        StatusCode::OK,
        Json(dto::PermissionsResponse {
            login: principal.login().to_string(),
            permissions,
        }),
    )
        .into_response()
}

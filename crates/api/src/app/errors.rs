use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use dashgate_infra::{AuthError, ServiceError, INVALID_CREDENTIALS};

/// Map a service failure onto a status code. Store failures stay opaque.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, "bad_request", msg),
        ServiceError::Validation(e) => json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Store(e) => {
            error!(error = %e, "store failure");
            internal_error()
        }
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => {
            json_error(StatusCode::BAD_REQUEST, "invalid_credentials", INVALID_CREDENTIALS)
        }
        AuthError::InvalidRefreshToken(_) => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_refresh_token", "invalid refresh token")
        }
        AuthError::Store(_) | AuthError::Signing(_) => internal_error(),
    }
}

pub fn internal_error() -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

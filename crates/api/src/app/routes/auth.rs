//! Session endpoints: native login and access token refresh.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::{dto, errors, services::AppServices};
use crate::cookies;

pub fn router() -> Router {
    Router::new()
        .route("/providers/native/login", post(login))
        .route("/refresh", post(refresh))
}

/// POST /api/auth/providers/native/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let tokens = match services.sessions.authenticate(&body.login, &body.password) {
        Ok(tokens) => tokens,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let jar = services.cookies.add_session(jar, &tokens);
    (StatusCode::OK, jar, Json(tokens)).into_response()
}

/// POST /api/auth/refresh - refresh token from the body or from its cookie
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    body: Option<Json<dto::RefreshRequest>>,
) -> axum::response::Response {
    let presented = body
        .and_then(|Json(b)| b.refresh_token)
        .filter(|t| !t.is_empty())
        .or_else(|| cookies::refresh_token_from(&jar));

    let Some(refresh_token) = presented else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "missing_refresh_token", "missing refresh token");
    };

    let access = match services.sessions.refresh_access(&refresh_token) {
        Ok(access) => access,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let jar = services.cookies.add_access(jar, &access);
    (StatusCode::OK, jar, Json(dto::RefreshResponse { access_token: access })).into_response()
}

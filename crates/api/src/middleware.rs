use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use dashgate_auth::{Principal, TokenKind, TokenVerifier};

use crate::context::PrincipalContext;
use crate::cookies;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Require a valid access token, from the `Authorization` header or from the
/// split session cookies.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = access_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state
        .verifier
        .verify(&token, TokenKind::Access)
        .map_err(|e| {
            debug!(error = %e, "access token rejected");
            StatusCode::UNAUTHORIZED
        })?;

    req.extensions_mut()
        .insert(PrincipalContext::new(Principal::new(claims.sub)));

    Ok(next.run(req).await)
}

fn access_token(headers: &HeaderMap) -> Option<String> {
    if headers.contains_key(axum::http::header::AUTHORIZATION) {
        return extract_bearer(headers).map(str::to_string);
    }
    cookies::access_token_from(&CookieJar::from_headers(headers))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

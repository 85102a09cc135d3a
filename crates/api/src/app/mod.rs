//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring, permission cache and admin bootstrap
//! - `routes/`: HTTP routes + handlers (one file per entity kind)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use dashgate_infra::ServiceError;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Result<Router, ServiceError> {
    let services = Arc::new(services::AppServices::build(config)?);
    let auth_state = middleware::AuthState {
        verifier: services.signer.clone(),
    };

    // Protected routes: require a valid access token.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let sessions = routes::auth::router().layer(Extension(services));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", protected)
        .nest("/api/auth", sessions)
        .layer(ServiceBuilder::new()))
}

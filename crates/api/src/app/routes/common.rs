use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;

use dashgate_auth::AnyEntity;

use crate::app::errors;

/// Unwrap a tagged entity body; malformed JSON and unknown kinds are 400s.
pub fn entity_body(body: Result<Json<AnyEntity>, JsonRejection>) -> Result<AnyEntity, axum::response::Response> {
    body.map(|Json(entity)| entity)
        .map_err(|rejection| errors::json_error(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text()))
}

//! Demonstration endpoints.
//!
//! Just enough surface to exercise every guard tier end to end.

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use serde_json::json;

use crate::auth::Principal;

/// Unguarded.
pub async fn healthcheck(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(json!({
        "status": "available",
        "anonymous": principal.is_anonymous(),
    }))
}

/// Requires an activated account.
pub async fn current_user(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(json!({ "user": principal.user() }))
}

/// Requires `movies:read`.
pub async fn list_movies() -> impl IntoResponse {
    Json(json!({ "movies": [] }))
}

/// Requires `movies:write`.
pub async fn create_movie(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(json!({ "created_by": principal.id() })),
    )
}

//! Error responses.
//!
//! # Responsibilities
//! - Map each `AccessError` to exactly one status code
//! - Render a JSON `{"error": ...}` body that never names the underlying cause
//! - Add the `WWW-Authenticate` challenge on credential failures

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AccessError;
use crate::observability::metrics;

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AccessError::InvalidCredential | AccessError::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            AccessError::NotActivated | AccessError::NotPermitted => StatusCode::FORBIDDEN,
            AccessError::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        if let AccessError::InternalFailure(detail) = &self {
            tracing::error!(error = %detail, "Internal failure while authorizing request");
        }
        metrics::record_rejection(self.kind());

        let mut response = (self.status(), Json(json!({ "error": self.to_string() }))).into_response();

        if self == AccessError::InvalidCredential {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

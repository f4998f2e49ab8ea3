//! Bearer token resolution.
//!
//! # Responsibilities
//! - Parse the `Authorization` header
//! - Reject malformed credentials before any lookup
//! - Exchange well-formed tokens for a principal (authentication scope)
//! - Attach the principal (or `Anonymous`) to the request extensions
//!
//! # Design Decisions
//! - Malformed, unknown and expired tokens all surface as `InvalidCredential`
//! - Every response carries `Vary: Authorization`, rejections included

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::VARY, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::principal::Principal;
use crate::auth::store::{StoreError, TokenScope, TokenStore};
use crate::auth::token::{is_valid_token_shape, parse_authorization, Credential};
use crate::error::AccessError;

/// Turns request credentials into a [`Principal`].
pub struct PrincipalResolver {
    tokens: Arc<dyn TokenStore>,
    token_length: usize,
}

impl PrincipalResolver {
    pub fn new(tokens: Arc<dyn TokenStore>, token_length: usize) -> Self {
        Self {
            tokens,
            token_length,
        }
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Principal, AccessError> {
        let token = match parse_authorization(headers)? {
            Credential::Absent => return Ok(Principal::Anonymous),
            Credential::Bearer(token) => token,
        };

        if !is_valid_token_shape(token, self.token_length) {
            return Err(AccessError::InvalidCredential);
        }

        match self
            .tokens
            .principal_for_token(TokenScope::Authentication, token)
            .await
        {
            Ok(principal) => Ok(principal),
            Err(StoreError::NotFound) => Err(AccessError::InvalidCredential),
            Err(e) => Err(AccessError::internal(format!("token lookup failed: {}", e))),
        }
    }
}

/// Middleware that attaches the request principal.
pub async fn authenticate_middleware(
    State(resolver): State<Arc<PrincipalResolver>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let resolved = resolver.resolve(request.headers()).await;
    let mut response = match resolved {
        Ok(principal) => {
            tracing::trace!(user_id = ?principal.id(), "Principal resolved");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            if !err.is_internal() {
                tracing::debug!(reason = err.kind(), "Credential rejected");
            }
            err.into_response()
        }
    };

    response
        .headers_mut()
        .append(VARY, HeaderValue::from_static("Authorization"));
    response
}

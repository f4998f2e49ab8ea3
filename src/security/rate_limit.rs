//! Per-client rate limiting middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::RateLimitConfig;
use crate::error::AccessError;
use crate::security::client_ip::client_identity;
use crate::security::registry::ClientRegistry;

/// State for the rate limiting stage.
#[derive(Debug)]
pub struct RateLimiter {
    enabled: bool,
    trust_forwarded_headers: bool,
    registry: Arc<ClientRegistry>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            trust_forwarded_headers: config.trust_forwarded_headers,
            registry: Arc::new(ClientRegistry::new(
                config.requests_per_second,
                config.burst_size,
                Duration::from_secs(config.idle_timeout_secs),
            )),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Admit or reject one request from `identity`.
    pub fn check(&self, identity: &str) -> Result<(), AccessError> {
        if !self.enabled {
            return Ok(());
        }

        if self.registry.resolve(identity).allow() {
            Ok(())
        } else {
            Err(AccessError::RateLimitExceeded)
        }
    }

    /// Rate limit key for `request` under the configured header trust policy.
    pub fn identity_of<B>(&self, request: &Request<B>) -> String {
        client_identity(request, self.trust_forwarded_headers)
    }
}

/// Middleware function for per-client rate limiting.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.is_enabled() {
        return next.run(request).await;
    }

    let client = limiter.identity_of(&request);

    match limiter.check(&client) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(client = %client, "Rate limit exceeded");
            err.into_response()
        }
    }
}

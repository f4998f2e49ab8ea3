//! Admission and authorization outcomes.
//!
//! Every stage of the gate stops the request with exactly one of these.
//! The mapping to HTTP lives in `http::response`.

use thiserror::Error;

/// Terminal rejection produced by the rate limiter, the principal resolver or a guard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("invalid or missing authentication token")]
    InvalidCredential,

    #[error("you must be authenticated to access this resource")]
    AuthenticationRequired,

    #[error("your user account must be activated to access this resource")]
    NotActivated,

    #[error("your user account doesn't have the necessary permissions to access this resource")]
    NotPermitted,

    /// A collaborator misbehaved. The detail is for logs only.
    #[error("the server encountered a problem and could not process your request")]
    InternalFailure(String),
}

impl AccessError {
    pub fn internal(detail: impl Into<String>) -> Self {
        AccessError::InternalFailure(detail.into())
    }

    /// Stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::RateLimitExceeded => "rate_limit_exceeded",
            AccessError::InvalidCredential => "invalid_credential",
            AccessError::AuthenticationRequired => "authentication_required",
            AccessError::NotActivated => "not_activated",
            AccessError::NotPermitted => "not_permitted",
            AccessError::InternalFailure(_) => "internal_failure",
        }
    }

    /// Only collaborator failures count as defects; everything else is the caller's doing.
    pub fn is_internal(&self) -> bool {
        matches!(self, AccessError::InternalFailure(_))
    }
}

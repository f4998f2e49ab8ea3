//! Authorization guards.
//!
//! A chain is an explicit, ordered list of stages evaluated one after another.
//! The constructors fix the nesting: permission implies activation implies
//! authentication, and evaluation stops at the first failing stage.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::principal::Principal;
use crate::auth::store::PermissionStore;
use crate::error::AccessError;

/// One tier of the authorization chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardStage {
    RequireAuthenticated,
    RequireActivated,
    RequirePermission(String),
}

impl GuardStage {
    async fn check(
        &self,
        principal: &Principal,
        permissions: &dyn PermissionStore,
    ) -> Result<(), AccessError> {
        match self {
            GuardStage::RequireAuthenticated => {
                if principal.is_anonymous() {
                    return Err(AccessError::AuthenticationRequired);
                }
            }
            GuardStage::RequireActivated => {
                if !principal.is_activated() {
                    return Err(AccessError::NotActivated);
                }
            }
            GuardStage::RequirePermission(code) => {
                // Earlier stages guarantee a user; a bare stage on an anonymous principal still fails closed.
                let user_id = principal.id().ok_or(AccessError::AuthenticationRequired)?;
                let granted = permissions
                    .permissions_for_user(user_id)
                    .await
                    .map_err(|e| AccessError::internal(format!("permission lookup failed: {}", e)))?;

                if !granted.includes(code) {
                    return Err(AccessError::NotPermitted);
                }
            }
        }
        Ok(())
    }
}

/// Ordered guard stages for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationChain {
    stages: Vec<GuardStage>,
}

impl AuthorizationChain {
    pub fn authenticated() -> Self {
        Self {
            stages: vec![GuardStage::RequireAuthenticated],
        }
    }

    pub fn activated() -> Self {
        let mut chain = Self::authenticated();
        chain.stages.push(GuardStage::RequireActivated);
        chain
    }

    pub fn permission(code: impl Into<String>) -> Self {
        let mut chain = Self::activated();
        chain.stages.push(GuardStage::RequirePermission(code.into()));
        chain
    }

    pub fn stages(&self) -> &[GuardStage] {
        &self.stages
    }

    /// Run every stage in order, stopping at the first rejection.
    pub async fn evaluate(
        &self,
        principal: &Principal,
        permissions: &dyn PermissionStore,
    ) -> Result<(), AccessError> {
        for stage in &self.stages {
            stage.check(principal, permissions).await?;
        }
        Ok(())
    }
}

/// State for a guarded route.
#[derive(Clone)]
pub struct GuardState {
    chain: Arc<AuthorizationChain>,
    permissions: Arc<dyn PermissionStore>,
}

impl GuardState {
    pub fn new(chain: AuthorizationChain, permissions: Arc<dyn PermissionStore>) -> Self {
        Self {
            chain: Arc::new(chain),
            permissions,
        }
    }
}

/// Route middleware enforcing a chain against the principal attached upstream.
pub async fn guard_middleware(
    State(state): State<GuardState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Principal>().cloned() else {
        return AccessError::internal("guard reached without a resolved principal").into_response();
    };

    match state
        .chain
        .evaluate(&principal, state.permissions.as_ref())
        .await
    {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::debug!(user_id = ?principal.id(), reason = err.kind(), "Request not authorized");
            err.into_response()
        }
    }
}

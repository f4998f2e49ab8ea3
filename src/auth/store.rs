//! Lookups the gate delegates to the persistence layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::principal::{Permissions, Principal, UserId};

/// What a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Activation,
    Authentication,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Activation => "activation",
            TokenScope::Authentication => "authentication",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live record matches. Covers unknown and expired tokens alike.
    #[error("record not found")]
    NotFound,

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Exchanges a plaintext token for the principal it is bound to.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn principal_for_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> Result<Principal, StoreError>;
}

/// Loads the full capability set of a user.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn permissions_for_user(&self, user_id: UserId) -> Result<Permissions, StoreError>;
}

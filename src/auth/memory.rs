//! In-process token and permission store.
//!
//! Backs local runs and tests. Accounts come from the `[[accounts]]` config table.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::auth::principal::{Permissions, Principal, User, UserId};
use crate::auth::store::{PermissionStore, StoreError, TokenScope, TokenStore};
use crate::config::AccountConfig;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: HashMap<UserId, User>,
    tokens: HashMap<(TokenScope, String), UserId>,
    permissions: HashMap<UserId, Permissions>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_accounts(accounts: &[AccountConfig]) -> Self {
        accounts.iter().fold(Self::new(), |store, account| {
            let user = User {
                id: account.id,
                name: account.name.clone(),
                email: account.email.clone(),
                activated: account.activated,
            };
            let store = account
                .tokens
                .iter()
                .fold(store.with_user(user), |store, token| {
                    store.with_token(TokenScope::Authentication, token, account.id)
                });
            store.with_permissions(account.id, account.permissions.iter().map(String::as_str))
        })
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    pub fn with_token(mut self, scope: TokenScope, plaintext: &str, user_id: UserId) -> Self {
        self.tokens.insert((scope, plaintext.to_string()), user_id);
        self
    }

    pub fn with_permissions<'a>(
        mut self,
        user_id: UserId,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.permissions.insert(user_id, codes.into_iter().collect());
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn principal_for_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> Result<Principal, StoreError> {
        self.tokens
            .get(&(scope, plaintext.to_string()))
            .and_then(|id| self.users.get(id))
            .cloned()
            .map(Principal::User)
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn permissions_for_user(&self, user_id: UserId) -> Result<Permissions, StoreError> {
        Ok(self.permissions.get(&user_id).cloned().unwrap_or_default())
    }
}

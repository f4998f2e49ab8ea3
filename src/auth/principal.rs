//! Request principal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// A persisted user as seen by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub activated: bool,
}

/// Identity attached to a request once credentials are resolved.
///
/// Built once per request and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(User),
}

impl Principal {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }

    pub fn id(&self) -> Option<UserId> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user.id),
        }
    }

    /// Anonymous principals are never activated.
    pub fn is_activated(&self) -> bool {
        match self {
            Principal::Anonymous => false,
            Principal::User(user) => user.activated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user),
        }
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Principal::User(user)
    }
}

/// Capability codes granted to a user. Only ever tested for membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(HashSet<String>);

impl Permissions {
    pub fn includes(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Permissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Permissions(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_nothing() {
        let anon = Principal::default();
        assert!(anon.is_anonymous());
        assert!(!anon.is_activated());
        assert_eq!(anon.id(), None);
        assert!(anon.user().is_none());
    }

    #[test]
    fn test_permissions_membership() {
        let perms: Permissions = ["movies:read", "movies:write"].into_iter().collect();
        assert!(perms.includes("movies:write"));
        assert!(!perms.includes("movies:delete"));
        assert_eq!(perms.len(), 2);
    }
}

//! Session user lookup used to scope business resolution to its owner.

use serde::{Deserialize, Serialize};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Source of the current session's user. Sign-in flows live elsewhere.
pub trait AuthProvider {
    fn current_user(&self) -> Option<User>;
}

/// Fixed session, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self {
            user: Some(User {
                id: id.into(),
                email: None,
            }),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

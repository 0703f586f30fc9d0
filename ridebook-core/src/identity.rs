use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to an account by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Who is acting. Handed explicitly to every view and to the wizard at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: UserId,
    pub email: String,
    pub is_admin: bool,
}

/// Profile record provisioned alongside a new account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }
}

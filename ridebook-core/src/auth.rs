use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::validation::FieldErrors;

pub const USER_NOT_FOUND: &str = "auth/user-not-found";
pub const WRONG_PASSWORD: &str = "auth/wrong-password";
pub const EMAIL_ALREADY_IN_USE: &str = "auth/email-already-in-use";
pub const WEAK_PASSWORD: &str = "auth/weak-password";
pub const INVALID_EMAIL: &str = "auth/invalid-email";
pub const SESSION_EXPIRED: &str = "auth/session-expired";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Known auth error codes and the text shown to users for them
const FRIENDLY_MESSAGES: &[(&str, &str)] = &[
    (USER_NOT_FOUND, "No account found with this email"),
    (WRONG_PASSWORD, "Incorrect password"),
    (EMAIL_ALREADY_IN_USE, "Email already in use"),
    (WEAK_PASSWORD, "Password is too weak"),
    (INVALID_EMAIL, "Invalid email address"),
];

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// Error reported by the identity provider, identified by a provider code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }

    pub fn user_not_found() -> Self {
        Self::new(USER_NOT_FOUND, "There is no user record corresponding to this identifier.")
    }

    pub fn wrong_password() -> Self {
        Self::new(WRONG_PASSWORD, "The password is invalid.")
    }

    pub fn email_already_in_use() -> Self {
        Self::new(EMAIL_ALREADY_IN_USE, "The email address is already in use by another account.")
    }

    pub fn weak_password() -> Self {
        Self::new(WEAK_PASSWORD, "Password should be at least 6 characters.")
    }

    pub fn invalid_email() -> Self {
        Self::new(INVALID_EMAIL, "The email address is badly formatted.")
    }

    pub fn session_expired() -> Self {
        Self::new(SESSION_EXPIRED, "The session is no longer valid. Sign in again.")
    }

    /// Text for end users: the table entry for known codes, the raw provider message otherwise
    pub fn friendly_message(&self) -> &str {
        FRIENDLY_MESSAGES
            .iter()
            .find(|(code, _)| *code == self.code)
            .map(|(_, text)| *text)
            .unwrap_or(self.message.as_str())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Please enter a valid email");
    }
}

/// Form checks run before any call to the auth gateway
pub fn validate_sign_in(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(email, &mut errors);
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_sign_up(email: &str, password: &str, confirm_password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(email, &mut errors);

    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }

    if confirm_password.is_empty() {
        errors.add("confirm_password", "Please confirm your password");
    } else if password != confirm_password {
        errors.add("confirm_password", "Passwords do not match");
    }

    errors.into_result()
}

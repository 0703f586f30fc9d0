pub mod auth;

pub use auth::{admin_guard, issue_token, viewer_middleware, Claims, Viewer};

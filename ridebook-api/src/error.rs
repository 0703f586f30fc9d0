use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ridebook_booking::WizardError;
use ridebook_core::{auth, AuthError, FieldErrors, GatewayError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    /// Per-field form errors; never reached a gateway
    InvalidFields(FieldErrors),
    NotFoundError(String),
    ConflictError(String),
    /// Rejected by the identity provider
    Auth(AuthError),
    /// A gateway could not be reached or failed mid-call
    UpstreamError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::InvalidFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Please correct the highlighted fields", "fields": fields }),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Auth(err) => {
                let status = match err.code.as_str() {
                    auth::EMAIL_ALREADY_IN_USE => StatusCode::CONFLICT,
                    auth::WEAK_PASSWORD | auth::INVALID_EMAIL => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNAUTHORIZED,
                };
                (status, json!({ "error": err.friendly_message(), "code": err.code }))
            }
            AppError::UpstreamError(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => AppError::NotFoundError(format!("Booking {} not found", what)),
            GatewayError::PermissionDenied(msg) => AppError::AuthorizationError(msg),
            GatewayError::Transport(msg) => AppError::UpstreamError(format!("Booking service unavailable: {}", msg)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::InvalidFields(errors)
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Validation(fields) => AppError::InvalidFields(fields),
            WizardError::Gateway(e) => e.into(),
            e @ (WizardError::WrongStage { .. } | WizardError::NotAtReview(_) | WizardError::Incomplete(_)) => {
                AppError::ConflictError(e.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

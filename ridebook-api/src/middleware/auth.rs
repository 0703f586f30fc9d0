use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use ridebook_core::{AuthError, Identity, Owner, UserId};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    state::{AppState, AuthConfig},
};

pub const ROLE_CUSTOMER: &str = "CUSTOMER";
pub const ROLE_ADMIN: &str = "ADMIN";

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

pub fn issue_token(auth: &AuthConfig, identity: &Identity) -> Result<String, AppError> {
    let claims = Claims {
        sub: identity.uid.to_string(),
        email: identity.email.clone(),
        role: if identity.is_admin { ROLE_ADMIN } else { ROLE_CUSTOMER }.to_owned(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

// ============================================================================
// Viewer
// ============================================================================

/// Who is making the request; `None` for guests
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<Identity>);

impl Viewer {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    pub fn owner(&self) -> Owner {
        Owner::from_identity(self.identity())
    }

    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|id| id.is_admin)
    }

    pub fn require_identity(&self) -> Result<&Identity, AppError> {
        self.identity()
            .ok_or_else(|| AppError::AuthenticationError("Please sign in to continue".to_string()))
    }
}

/// Resolve the optional bearer token into a `Viewer`.
///
/// No header means guest. A token that fails to decode, or whose user has signed out since,
/// is rejected.
pub async fn viewer_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    let viewer = match token {
        None => Viewer(None),
        Some(token) => {
            let token_data = decode::<Claims>(
                &token,
                &DecodingKey::from_secret(state.auth.secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|_| AuthError::session_expired())?;

            let uid = UserId(token_data.claims.sub);
            let identity = state
                .identity
                .current_identity(&uid)
                .await?
                .ok_or_else(AuthError::session_expired)?;
            Viewer(Some(identity))
        }
    };

    req.extensions_mut().insert(viewer);
    Ok(next.run(req).await)
}

// ============================================================================
// Admin Guard
// ============================================================================

pub async fn admin_guard(req: Request, next: Next) -> Result<Response, AppError> {
    let viewer = req.extensions().get::<Viewer>().cloned().unwrap_or_default();
    viewer.require_identity()?;
    if !viewer.is_admin() {
        return Err(AppError::AuthorizationError("Admin access required".to_string()));
    }
    Ok(next.run(req).await)
}

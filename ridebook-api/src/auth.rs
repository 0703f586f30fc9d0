use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use ridebook_core::{auth, Identity};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError,
    middleware::{issue_token, Viewer},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub identity: Identity,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub guest: bool,
    pub identity: Option<Identity>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(sign_up))
        .route("/v1/auth/signin", post(sign_in))
        .route("/v1/auth/signout", post(sign_out))
        .route("/v1/auth/me", get(me))
}

async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    auth::validate_sign_up(&req.email, &req.password, &req.confirm_password)?;

    let identity = state.identity.sign_up(req.email.trim(), &req.password).await?;
    let token = issue_token(&state.auth, &identity)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, identity })))
}

async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    auth::validate_sign_in(&req.email, &req.password)?;

    let identity = state.identity.sign_in(req.email.trim(), &req.password).await?;
    let token = issue_token(&state.auth, &identity)?;
    info!("Issued token for {}", identity.uid);

    Ok(Json(AuthResponse { token, identity }))
}

async fn sign_out(State(state): State<AppState>, Extension(viewer): Extension<Viewer>) -> Result<StatusCode, AppError> {
    let identity = viewer.require_identity()?;
    state.identity.sign_out(&identity.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(Extension(viewer): Extension<Viewer>) -> Json<MeResponse> {
    Json(MeResponse {
        guest: viewer.identity().is_none(),
        identity: viewer.0,
    })
}

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use ridebook_booking::{admin, views, AdminAction, AdminStats, MutationOutcome, Prompt, SortKey, StatusFilter};
use ridebook_core::{Booking, BookingId, BookingStatus};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::admin_guard, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub status: StatusFilter,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

#[derive(Debug, Serialize)]
pub struct AdminListResponse {
    pub bookings: Vec<Booking>,
    pub stats: AdminStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct Acknowledgment {
    #[serde(default)]
    pub acknowledged: bool,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub id: BookingId,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    pub notice: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/bookings/{id}", axum::routing::delete(delete_booking))
        .route("/v1/admin/bookings/{id}/confirm", post(confirm_booking))
        .route("/v1/admin/bookings/{id}/cancel", post(cancel_booking))
        .route_layer(middleware::from_fn(admin_guard))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<AdminListResponse>, AppError> {
    let records = state.bookings.list_all().await?;

    let stats = AdminStats::from_bookings(&records);
    let bookings = views::apply(&records, query.status, query.search.as_deref(), query.sort);

    Ok(Json(AdminListResponse { bookings, stats }))
}

/// Failures surface as errors; every other outcome is reported as-is
fn respond(state: &AppState, action: AdminAction, outcome: MutationOutcome) -> Result<Json<MutationResponse>, AppError> {
    state.metrics.record_admin(action, &outcome);

    let notice = outcome.notice();
    match outcome {
        MutationOutcome::Failed { error, .. } => Err(error.into()),
        MutationOutcome::StatusChanged { id, status } => Ok(Json(MutationResponse {
            id,
            outcome: "status_changed",
            status: Some(status),
            notice,
        })),
        other => Ok(Json(MutationResponse {
            id: other.id().clone(),
            outcome: other.label(),
            status: None,
            notice,
        })),
    }
}

async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let outcome = admin::confirm(state.bookings.as_ref(), &BookingId(id)).await;
    respond(&state, AdminAction::Confirm, outcome)
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(ack): Json<Acknowledgment>,
) -> Result<Json<MutationResponse>, AppError> {
    let outcome = admin::cancel(state.bookings.as_ref(), &BookingId(id), Prompt::from(ack.acknowledged)).await;
    respond(&state, AdminAction::Cancel, outcome)
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(ack): Query<Acknowledgment>,
) -> Result<Json<MutationResponse>, AppError> {
    let outcome = admin::delete(state.bookings.as_ref(), &BookingId(id), Prompt::from(ack.acknowledged)).await;
    respond(&state, AdminAction::Delete, outcome)
}

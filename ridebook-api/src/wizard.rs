use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use ridebook_booking::{PassengerForm, WizardError, WizardSession, WizardSnapshot};
use ridebook_core::Booking;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::Viewer,
    routes::find_route,
    sessions::SharedSession,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub snapshot: WizardSnapshot,
}

/// Result of an action that may be a no-op (seat toggle, navigation)
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub changed: bool,
    #[serde(flatten)]
    pub snapshot: WizardSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub date: Option<NaiveDate>,
    pub departure_time: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/routes/{id}/wizard", post(open_wizard))
        .route("/v1/wizard/{sid}", get(get_wizard).delete(discard_wizard))
        .route("/v1/wizard/{sid}/schedule", put(set_schedule))
        .route("/v1/wizard/{sid}/seats/{seat}", post(toggle_seat))
        .route("/v1/wizard/{sid}/passenger", put(set_passenger))
        .route("/v1/wizard/{sid}/next", post(next_stage))
        .route("/v1/wizard/{sid}/back", post(previous_stage))
        .route("/v1/wizard/{sid}/submit", post(submit))
}

async fn session(state: &AppState, sid: &Uuid) -> Result<SharedSession, AppError> {
    state
        .wizards
        .get(sid)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Booking session {} not found", sid)))
}

async fn open_wizard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<WizardResponse>), AppError> {
    let route = find_route(&state, &id)?;
    let today = Utc::now().date_naive();
    let taken = state.seats.taken_seats(&route.id, today).await?;

    let wizard = WizardSession::new(route, taken, today);
    let snapshot = wizard.snapshot();
    let session_id = state.wizards.open(wizard).await;

    Ok((StatusCode::CREATED, Json(WizardResponse { session_id, snapshot })))
}

async fn get_wizard(State(state): State<AppState>, Path(sid): Path<Uuid>) -> Result<Json<WizardResponse>, AppError> {
    let shared = session(&state, &sid).await?;
    let snapshot = shared.lock().await.snapshot();
    Ok(Json(WizardResponse { session_id: sid, snapshot }))
}

async fn discard_wizard(State(state): State<AppState>, Path(sid): Path<Uuid>) -> Result<StatusCode, AppError> {
    if state.wizards.discard(&sid).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("Booking session {} not found", sid)))
    }
}

async fn set_schedule(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let shared = session(&state, &sid).await?;
    let mut wizard = shared.lock().await;

    // all-or-nothing: the stored session only changes once every step has succeeded
    let mut updated = wizard.clone();
    if let Some(date) = req.date {
        updated.set_journey_date(date)?;
        let taken = state.seats.taken_seats(&updated.route().id, date).await?;
        updated.refresh_taken_seats(taken);
    }
    if let Some(time) = req.departure_time.as_deref() {
        updated.select_departure(time)?;
    }

    *wizard = updated;
    Ok(Json(wizard.snapshot()))
}

async fn toggle_seat(
    State(state): State<AppState>,
    Path((sid, seat)): Path<(Uuid, u32)>,
) -> Result<Json<StepResponse>, AppError> {
    let shared = session(&state, &sid).await?;
    let mut wizard = shared.lock().await;

    let changed = wizard.toggle_seat(seat)?.is_some();
    Ok(Json(StepResponse { changed, snapshot: wizard.snapshot() }))
}

async fn set_passenger(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(form): Json<PassengerForm>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let shared = session(&state, &sid).await?;
    let mut wizard = shared.lock().await;

    wizard.update_passenger(form)?;
    Ok(Json(wizard.snapshot()))
}

async fn next_stage(State(state): State<AppState>, Path(sid): Path<Uuid>) -> Result<Json<StepResponse>, AppError> {
    let shared = session(&state, &sid).await?;
    let mut wizard = shared.lock().await;

    let changed = wizard.advance();
    Ok(Json(StepResponse { changed, snapshot: wizard.snapshot() }))
}

async fn previous_stage(State(state): State<AppState>, Path(sid): Path<Uuid>) -> Result<Json<StepResponse>, AppError> {
    let shared = session(&state, &sid).await?;
    let mut wizard = shared.lock().await;

    let changed = wizard.back();
    Ok(Json(StepResponse { changed, snapshot: wizard.snapshot() }))
}

async fn submit(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(sid): Path<Uuid>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let shared = session(&state, &sid).await?;
    let wizard = shared.lock().await;

    match wizard.submit(state.bookings.as_ref(), viewer.owner()).await {
        Ok(booking) => {
            drop(wizard);
            state.wizards.discard(&sid).await;
            state.metrics.bookings_created.inc();
            info!("Booking session {} completed as {}", sid, booking.id);
            Ok((StatusCode::CREATED, Json(booking)))
        }
        Err(e) => {
            if matches!(e, WizardError::Gateway(_)) {
                state.metrics.submit_failures.inc();
            }
            Err(e.into())
        }
    }
}

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use ridebook_booking::{ticket, views, DashboardStats, SortKey, StatusFilter};
use ridebook_core::{Booking, BookingId, Owner};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::Viewer, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub filter: StatusFilter,
    #[serde(default)]
    pub sort: SortKey,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub bookings: Vec<Booking>,
    pub stats: DashboardStats,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(my_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/ticket", get(download_ticket))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let identity = viewer.require_identity()?;
    let records = state.bookings.list_by_owner(&Owner::User(identity.uid.clone())).await?;

    let stats = DashboardStats::from_bookings(&records);
    let bookings = views::apply(&records, query.filter, None, query.sort);

    Ok(Json(DashboardResponse { bookings, stats }))
}

/// Guest bookings are reachable by id alone; user bookings only by their owner or an admin
async fn visible_booking(state: &AppState, viewer: &Viewer, id: String) -> Result<Booking, AppError> {
    let id = BookingId(id);
    let booking = state
        .bookings
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking {} not found", id)))?;

    let allowed = booking.owner == Owner::Guest || booking.owner == viewer.owner() || viewer.is_admin();
    if !allowed {
        return Err(AppError::AuthorizationError("This booking belongs to another account".to_string()));
    }
    Ok(booking)
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(visible_booking(&state, &viewer, id).await?))
}

async fn download_ticket(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = visible_booking(&state, &viewer, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", ticket::file_name(&booking));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ticket::render(&booking),
    ))
}

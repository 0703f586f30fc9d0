use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use ridebook_catalog::{Route, RouteId, RouteQuery, SeatLayout, SeatPosition};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SeatMapQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SeatView {
    pub number: u32,
    pub taken: bool,
    pub position: SeatPosition,
}

#[derive(Debug, Serialize)]
pub struct SeatMap {
    pub route_id: RouteId,
    pub date: NaiveDate,
    pub row_width: u32,
    pub available: usize,
    pub rows: Vec<Vec<SeatView>>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/routes", get(search_routes))
        .route("/v1/routes/{id}", get(get_route))
        .route("/v1/routes/{id}/seats", get(seat_map))
}

pub(crate) fn find_route(state: &AppState, id: &str) -> Result<Route, AppError> {
    state
        .catalog
        .get(&RouteId::from(id))
        .cloned()
        .ok_or_else(|| AppError::NotFoundError(format!("Route {} not found", id)))
}

async fn search_routes(State(state): State<AppState>, Query(query): Query<RouteQuery>) -> Json<Vec<Route>> {
    Json(state.catalog.search(&query).into_iter().cloned().collect())
}

async fn get_route(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Route>, AppError> {
    Ok(Json(find_route(&state, &id)?))
}

async fn seat_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeatMapQuery>,
) -> Result<Json<SeatMap>, AppError> {
    let route = find_route(&state, &id)?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let taken = state.seats.taken_seats(&route.id, date).await?;

    let layout = SeatLayout::new(route.total_seats, state.row_width);
    let rows: Vec<Vec<SeatView>> = layout
        .rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|number| SeatView {
                    number,
                    taken: taken.contains(&number),
                    position: layout.position(number),
                })
                .collect()
        })
        .collect();
    let available = rows.iter().flatten().filter(|s| !s.taken).count();

    Ok(Json(SeatMap {
        route_id: route.id,
        date,
        row_width: layout.row_width(),
        available,
        rows,
    }))
}

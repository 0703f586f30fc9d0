use axum::{http::Method, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod wizard;

pub use state::{AppState, AuthConfig};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(auth::routes())
        .merge(routes::routes())
        .merge(wizard::routes())
        .merge(bookings::routes())
        .merge(admin::routes())
        .layer(axum::middleware::from_fn_with_state(state.clone(), middleware::viewer_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

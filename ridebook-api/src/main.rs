use anyhow::Context;
use ridebook_api::{app, AppState, AuthConfig};
use ridebook_catalog::RouteCatalog;
use ridebook_store::{app_config::Config, DbClient, PgBookingStore, RedisClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridebook_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting RideBook API on port {}", config.server.port);

    let catalog = RouteCatalog::builtin().context("Built-in route catalog is invalid")?;
    let mut state = AppState::in_memory(
        catalog,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        config.auth.admin_emails.clone(),
        config.seating.demo_taken_seats.clone(),
        config.seating.row_width,
        Duration::from_secs(config.sessions.ttl_seconds),
    )?;

    match config.database.url.as_deref() {
        Some(url) => {
            let db = DbClient::new(url).await.context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            state.bookings = Arc::new(PgBookingStore::new(db.pool.clone()));
            tracing::info!("Bookings stored in Postgres");
        }
        None => tracing::warn!("No database configured, bookings are kept in memory"),
    }

    match config.redis.url.as_deref() {
        Some(url) => {
            let redis = RedisClient::new(url).await.context("Failed to connect to Redis")?;
            state.seats = Arc::new(redis);
            tracing::info!("Taken seats read from Redis");
        }
        None => tracing::info!("Using demo taken seats {:?}", config.seating.demo_taken_seats),
    }

    state
        .wizards
        .spawn_sweeper(Duration::from_secs(config.sessions.sweep_interval_seconds.max(1)));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

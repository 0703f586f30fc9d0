use axum::{extract::State, http::header, response::IntoResponse};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use ridebook_booking::{AdminAction, MutationOutcome};

use crate::{error::AppError, state::AppState};

pub struct Metrics {
    registry: Registry,
    pub bookings_created: IntCounter,
    pub submit_failures: IntCounter,
    pub admin_mutations: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let bookings_created = IntCounter::new("ridebook_bookings_created_total", "Bookings created through the wizard")?;
        let submit_failures = IntCounter::new(
            "ridebook_booking_submit_failures_total",
            "Wizard submissions rejected by the booking store",
        )?;
        let admin_mutations = IntCounterVec::new(
            Opts::new("ridebook_admin_mutations_total", "Admin booking mutations by action and outcome"),
            &["action", "outcome"],
        )?;

        registry.register(Box::new(bookings_created.clone()))?;
        registry.register(Box::new(submit_failures.clone()))?;
        registry.register(Box::new(admin_mutations.clone()))?;

        Ok(Self { registry, bookings_created, submit_failures, admin_mutations })
    }

    pub fn record_admin(&self, action: AdminAction, outcome: &MutationOutcome) {
        self.admin_mutations
            .with_label_values(&[action.as_str(), outcome.label()])
            .inc();
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.render().map_err(anyhow::Error::from)?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

use ridebook_catalog::RouteCatalog;
use ridebook_core::{AuthGateway, BookingStore, SeatInventory};
use ridebook_store::{InMemoryAuthGateway, InMemoryBookingStore, StaticSeatInventory};
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::Metrics;
use crate::sessions::WizardRegistry;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RouteCatalog>,
    pub bookings: Arc<dyn BookingStore>,
    pub identity: Arc<dyn AuthGateway>,
    pub seats: Arc<dyn SeatInventory>,
    pub wizards: WizardRegistry,
    pub metrics: Arc<Metrics>,
    pub auth: AuthConfig,
    pub row_width: u32,
}

impl AppState {
    /// Everything held in process memory; used when no database or redis is configured
    pub fn in_memory(
        catalog: RouteCatalog,
        auth: AuthConfig,
        admin_emails: Vec<String>,
        taken_seats: Vec<u32>,
        row_width: u32,
        session_ttl: Duration,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            catalog: Arc::new(catalog),
            bookings: Arc::new(InMemoryBookingStore::new()),
            identity: Arc::new(InMemoryAuthGateway::new(admin_emails)),
            seats: Arc::new(StaticSeatInventory::new(taken_seats)),
            wizards: WizardRegistry::new(session_ttl),
            metrics: Arc::new(Metrics::new()?),
            auth,
            row_width,
        })
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use ridebook_catalog::RouteId;
use std::collections::BTreeSet;

use crate::auth::AuthError;
use crate::booking::{Booking, BookingId, BookingPatch, NewBooking, Owner};
use crate::identity::{Identity, UserId};

/// Failures reported by a storage-side collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Document store holding booking records
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Atomically persist a new booking; the store assigns id and creation time
    async fn create(&self, booking: NewBooking) -> Result<Booking, GatewayError>;

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, GatewayError>;

    async fn list_all(&self) -> Result<Vec<Booking>, GatewayError>;

    /// Bookings of one owner, newest first
    async fn list_by_owner(&self, owner: &Owner) -> Result<Vec<Booking>, GatewayError>;

    /// Fails with `NotFound` when the booking does not exist
    async fn update(&self, id: &BookingId, patch: BookingPatch) -> Result<(), GatewayError>;

    /// Fails with `NotFound` when the booking does not exist
    async fn delete(&self, id: &BookingId) -> Result<(), GatewayError>;
}

/// Identity provider
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create the account and provision its profile record
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self, uid: &UserId) -> Result<(), AuthError>;

    /// `None` when the user is unknown or signed out
    async fn current_identity(&self, uid: &UserId) -> Result<Option<Identity>, AuthError>;
}

/// Source of seats that can no longer be selected for a journey
#[async_trait]
pub trait SeatInventory: Send + Sync {
    async fn taken_seats(&self, route: &RouteId, date: NaiveDate) -> Result<BTreeSet<u32>, GatewayError>;
}

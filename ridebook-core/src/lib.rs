pub mod auth;
pub mod booking;
pub mod identity;
pub mod repository;
pub mod validation;

pub use auth::AuthError;
pub use booking::{Booking, BookingId, BookingPatch, BookingStatus, NewBooking, Owner, Passenger};
pub use identity::{Identity, Profile, UserId};
pub use repository::{AuthGateway, BookingStore, GatewayError, SeatInventory};
pub use validation::FieldErrors;

pub mod admin;
pub mod seat_selector;
pub mod ticket;
pub mod views;
pub mod wizard;

#[cfg(test)]
mod test_support;

pub use admin::{AdminAction, BookingBoard, MutationOutcome, Prompt};
pub use seat_selector::{SeatSelector, SeatState};
pub use views::{AdminStats, DashboardStats, SortKey, StatusFilter};
pub use wizard::{PassengerForm, Stage, WizardError, WizardSession, WizardSnapshot};

pub mod route;
pub mod catalog;
pub mod search;
pub mod seating;

pub use route::{Route, RouteError, RouteId, VehicleKind};
pub use catalog::RouteCatalog;
pub use search::{KindFilter, PriceBand, RouteQuery, RouteSort};
pub use seating::{SeatLayout, SeatPosition};

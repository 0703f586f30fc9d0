pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod memory;
pub mod redis_repo;

pub use app_config::Config;
pub use booking_repo::PgBookingStore;
pub use database::DbClient;
pub use memory::{InMemoryAuthGateway, InMemoryBookingStore, StaticSeatInventory};
pub use redis_repo::RedisClient;

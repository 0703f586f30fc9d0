use async_trait::async_trait;
use chrono::NaiveDate;
use redis::AsyncCommands;
use ridebook_catalog::RouteId;
use ridebook_core::{GatewayError, SeatInventory};
use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Set of seat numbers already sold for one route on one day
    pub fn taken_key(route: &RouteId, date: NaiveDate) -> String {
        format!("taken:{}:{}", route, date.format("%Y-%m-%d"))
    }

    async fn seat_set(&self, key: &str) -> redis::RedisResult<Vec<u32>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.smembers(key).await
    }
}

#[async_trait]
impl SeatInventory for RedisClient {
    async fn taken_seats(&self, route: &RouteId, date: NaiveDate) -> Result<BTreeSet<u32>, GatewayError> {
        let key = Self::taken_key(route, date);
        match self.seat_set(&key).await {
            Ok(seats) => {
                debug!("{} seats taken under {}", seats.len(), key);
                Ok(seats.into_iter().collect())
            }
            Err(e) => {
                warn!("Seat inventory lookup failed for {}: {}", key, e);
                Err(GatewayError::Transport(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taken_key_format() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 9).unwrap();
        assert_eq!(RedisClient::taken_key(&RouteId::from("r2"), date), "taken:r2:2030-01-09");
    }
}

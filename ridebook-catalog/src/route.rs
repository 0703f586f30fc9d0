use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a catalog route (e.g. `r1`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub String);

impl RouteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Bus,
    Train,
}

impl VehicleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleKind::Bus => "bus",
            VehicleKind::Train => "train",
        }
    }
}

/// A statically known travel offering. Prices are in the smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub kind: VehicleKind,
    pub price: u32,
    pub total_seats: u32,
    pub vehicle: String,
    pub duration: String,
    pub departures: Vec<String>,
    pub stops: Vec<String>,
    pub rating: f32,
    pub amenities: Vec<String>,
}

impl Route {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: VehicleKind,
        price: u32,
        total_seats: u32,
        vehicle: impl Into<String>,
        duration: impl Into<String>,
        departures: &[&str],
    ) -> Result<Self, RouteError> {
        let id = id.into();
        if price == 0 {
            return Err(RouteError::InvalidPrice(id));
        }
        if total_seats == 0 {
            return Err(RouteError::InvalidCapacity(id));
        }
        if departures.is_empty() {
            return Err(RouteError::NoDepartures(id));
        }

        Ok(Self {
            id: RouteId(id),
            name: name.into(),
            kind,
            price,
            total_seats,
            vehicle: vehicle.into(),
            duration: duration.into(),
            departures: departures.iter().map(|d| d.to_string()).collect(),
            stops: Vec::new(),
            rating: 0.0,
            amenities: Vec::new(),
        })
    }

    /// Attach the descriptive fields used by route search
    pub fn with_details(mut self, stops: &[&str], rating: f32, amenities: &[&str]) -> Self {
        self.stops = stops.iter().map(|s| s.to_string()).collect();
        self.rating = rating;
        self.amenities = amenities.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn is_permitted_departure(&self, time: &str) -> bool {
        self.departures.iter().any(|d| d == time)
    }

    pub fn contains_seat(&self, seat: u32) -> bool {
        (1..=self.total_seats).contains(&seat)
    }

    /// Fare for `seat_count` seats. The only pricing rule: count × per-seat price.
    pub fn fare_for(&self, seat_count: usize) -> u64 {
        seat_count as u64 * u64::from(self.price)
    }

    /// Duration label ("2h 30m") in minutes; unparseable parts count as zero
    pub fn duration_minutes(&self) -> u32 {
        self.duration
            .split_whitespace()
            .map(|part| {
                if let Some(h) = part.strip_suffix('h') {
                    h.parse::<u32>().unwrap_or(0) * 60
                } else if let Some(m) = part.strip_suffix('m') {
                    m.parse::<u32>().unwrap_or(0)
                } else {
                    0
                }
            })
            .sum()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Route {0} must have a positive per-seat price")]
    InvalidPrice(String),

    #[error("Route {0} must have a positive seat capacity")]
    InvalidCapacity(String),

    #[error("Route {0} must list at least one departure time")]
    NoDepartures(String),
}

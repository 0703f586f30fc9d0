use chrono::{DateTime, NaiveDate, Utc};
use ridebook_catalog::RouteId;
use ridebook_shared::Masked;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identity::{Identity, UserId};

/// Identifier assigned by the booking store on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl BookingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

pub const GUEST_OWNER: &str = "guest";

/// Owner of a booking. Stored as the user id, or the `guest` sentinel for anonymous bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Owner {
    User(UserId),
    Guest,
}

impl Owner {
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        match identity {
            Some(id) => Owner::User(id.uid.clone()),
            None => Owner::Guest,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Owner::User(uid) => uid.as_str(),
            Owner::Guest => GUEST_OWNER,
        }
    }
}

impl From<String> for Owner {
    fn from(value: String) -> Self {
        if value == GUEST_OWNER {
            Owner::Guest
        } else {
            Owner::User(UserId(value))
        }
    }
}

impl From<Owner> for String {
    fn from(owner: Owner) -> Self {
        owner.as_str().to_string()
    }
}

/// Booking lifecycle. `Completed` is only ever written by systems outside this service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: u32,
    pub phone: Masked<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A booking as assembled by the wizard, before the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub route_id: RouteId,
    pub route_name: String,
    pub owner: Owner,
    pub passenger: Passenger,
    pub seats: Vec<u32>,
    pub price: u64,
    pub journey_date: NaiveDate,
    pub departure_time: String,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub route_id: RouteId,
    pub route_name: String,
    pub owner: Owner,
    pub passenger: Passenger,
    pub seats: Vec<u32>,
    pub price: u64,
    pub journey_date: NaiveDate,
    pub departure_time: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_new(id: BookingId, new: NewBooking, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            route_id: new.route_id,
            route_name: new.route_name,
            owner: new.owner,
            passenger: new.passenger,
            seats: new.seats,
            price: new.price,
            journey_date: new.journey_date,
            departure_time: new.departure_time,
            status: new.status,
            created_at,
        }
    }

    /// Pending or confirmed bookings are still ahead of the traveller
    pub fn is_upcoming(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Partial update accepted by the store; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

impl BookingPatch {
    pub fn status(status: BookingStatus) -> Self {
        Self { status: Some(status) }
    }

    pub fn apply(&self, booking: &mut Booking) {
        if let Some(status) = self.status {
            booking.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_guest_sentinel_roundtrip() {
        let json = serde_json::to_string(&Owner::Guest).unwrap();
        assert_eq!(json, "\"guest\"");

        let owner: Owner = serde_json::from_str("\"uid-42\"").unwrap();
        assert_eq!(owner, Owner::User(UserId("uid-42".to_string())));
    }

    #[test]
    fn test_owner_from_identity() {
        let identity = Identity {
            uid: UserId("uid-1".to_string()),
            email: "a@b.co".to_string(),
            is_admin: false,
        };
        assert_eq!(Owner::from_identity(Some(&identity)).as_str(), "uid-1");
        assert_eq!(Owner::from_identity(None), Owner::Guest);
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("confirmed".parse::<BookingStatus>(), Ok(BookingStatus::Confirmed));
        assert!("archived".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut booking = Booking {
            id: BookingId::from("b1"),
            route_id: RouteId::from("r1"),
            route_name: "CBE - Erode Express".to_string(),
            owner: Owner::Guest,
            passenger: Passenger {
                name: "A".to_string(),
                age: 30,
                phone: Masked::from("9999999999"),
                email: None,
            },
            seats: vec![8, 9],
            price: 500,
            journey_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            departure_time: "06:00 AM".to_string(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };

        BookingPatch::default().apply(&mut booking);
        assert_eq!(booking.status, BookingStatus::Pending);

        BookingPatch::status(BookingStatus::Confirmed).apply(&mut booking);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.price, 500);
    }
}

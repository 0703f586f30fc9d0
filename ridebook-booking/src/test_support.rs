use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use ridebook_catalog::{Route, RouteCatalog, RouteId};
use ridebook_core::{
    Booking, BookingId, BookingPatch, BookingStatus, BookingStore, GatewayError, NewBooking, Owner, Passenger,
};
use ridebook_shared::Masked;
use std::collections::BTreeSet;
use std::sync::Mutex;

pub fn erode_express() -> Route {
    RouteCatalog::builtin()
        .unwrap()
        .get(&RouteId::from("r1"))
        .cloned()
        .unwrap()
}

pub fn demo_taken() -> BTreeSet<u32> {
    [7, 14, 21, 28, 35].into_iter().collect()
}

pub fn booking(id: &str, status: BookingStatus, price: u64, created_minute: u32) -> Booking {
    Booking {
        id: BookingId::from(id),
        route_id: RouteId::from("r1"),
        route_name: "CBE - Erode Express".to_string(),
        owner: Owner::Guest,
        passenger: Passenger {
            name: format!("Passenger {}", id),
            age: 30,
            phone: Masked::new(format!("98765{:05}", created_minute)),
            email: None,
        },
        seats: vec![1],
        price,
        journey_date: NaiveDate::from_ymd_opt(2030, 5, 2).unwrap(),
        departure_time: "06:00 AM".to_string(),
        status,
        created_at: Utc.with_ymd_and_hms(2030, 5, 1, 10, created_minute, 0).unwrap(),
    }
}

/// Store double that records every call and can be switched into a failing mode
#[derive(Default)]
pub struct RecordingStore {
    fail: bool,
    created: Mutex<Vec<NewBooking>>,
    patches: Mutex<Vec<(BookingId, BookingPatch)>>,
    deleted: Mutex<Vec<BookingId>>,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn created(&self) -> Vec<NewBooking> {
        self.created.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<(BookingId, BookingPatch)> {
        self.patches.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<BookingId> {
        self.deleted.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.fail {
            return Err(GatewayError::Transport("store unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for RecordingStore {
    async fn create(&self, booking: NewBooking) -> Result<Booking, GatewayError> {
        self.check()?;
        let mut created = self.created.lock().unwrap();
        created.push(booking.clone());
        let id = BookingId(format!("b{}", created.len()));
        Ok(Booking::from_new(id, booking, Utc::now()))
    }

    async fn get(&self, _id: &BookingId) -> Result<Option<Booking>, GatewayError> {
        self.check()?;
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, GatewayError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn list_by_owner(&self, _owner: &Owner) -> Result<Vec<Booking>, GatewayError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn update(&self, id: &BookingId, patch: BookingPatch) -> Result<(), GatewayError> {
        self.check()?;
        self.patches.lock().unwrap().push((id.clone(), patch));
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), GatewayError> {
        self.check()?;
        self.deleted.lock().unwrap().push(id.clone());
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ridebook_catalog::RouteId;
use ridebook_core::{
    Booking, BookingId, BookingPatch, BookingStatus, BookingStore, GatewayError, NewBooking, Owner, Passenger,
};
use ridebook_shared::Masked;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, route_id, route_name, owner_id, passenger_name, passenger_age, passenger_phone,
           passenger_email, seats, total_price, journey_date, departure_time, status, created_at
    FROM bookings
"#;

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    route_id: String,
    route_name: String,
    owner_id: String,
    passenger_name: String,
    passenger_age: i32,
    passenger_phone: String,
    passenger_email: Option<String>,
    seats: Vec<i32>,
    total_price: i64,
    journey_date: NaiveDate,
    departure_time: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = GatewayError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::from_str(&row.status).map_err(GatewayError::Transport)?;
        Ok(Booking {
            id: BookingId(row.id.to_string()),
            route_id: RouteId(row.route_id),
            route_name: row.route_name,
            owner: Owner::from(row.owner_id),
            passenger: Passenger {
                name: row.passenger_name,
                age: row.passenger_age.max(0) as u32,
                phone: Masked::new(row.passenger_phone),
                email: row.passenger_email,
            },
            seats: row.seats.into_iter().map(|s| s.max(0) as u32).collect(),
            price: row.total_price.max(0) as u64,
            journey_date: row.journey_date,
            departure_time: row.departure_time,
            status,
            created_at: row.created_at,
        })
    }
}

fn transport(e: sqlx::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

/// Ids are uuids in Postgres; anything else cannot exist
fn parse_id(id: &BookingId) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, GatewayError> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<Booking, GatewayError> {
        let id = Uuid::new_v4();
        let seats: Vec<i32> = booking.seats.iter().map(|s| *s as i32).collect();

        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (id, route_id, route_name, owner_id, passenger_name, passenger_age,
                                  passenger_phone, passenger_email, seats, total_price, journey_date,
                                  departure_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, route_id, route_name, owner_id, passenger_name, passenger_age, passenger_phone,
                      passenger_email, seats, total_price, journey_date, departure_time, status, created_at
            "#,
        )
        .bind(id)
        .bind(booking.route_id.as_str())
        .bind(&booking.route_name)
        .bind(booking.owner.as_str())
        .bind(&booking.passenger.name)
        .bind(booking.passenger.age as i32)
        .bind(booking.passenger.phone.reveal())
        .bind(booking.passenger.email.as_deref())
        .bind(&seats)
        .bind(booking.price as i64)
        .bind(booking.journey_date)
        .bind(&booking.departure_time)
        .bind(booking.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(transport)?;

        row.try_into()
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, GatewayError> {
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, BookingRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(transport)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Booking>, GatewayError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!("{} ORDER BY created_at DESC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(transport)?;

        into_bookings(rows)
    }

    async fn list_by_owner(&self, owner: &Owner) -> Result<Vec<Booking>, GatewayError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE owner_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(transport)?;

        into_bookings(rows)
    }

    async fn update(&self, id: &BookingId, patch: BookingPatch) -> Result<(), GatewayError> {
        let uuid = parse_id(id).ok_or_else(|| GatewayError::NotFound(id.to_string()))?;

        let result = sqlx::query("UPDATE bookings SET status = COALESCE($2, status) WHERE id = $1")
            .bind(uuid)
            .bind(patch.status.map(|s| s.as_str()))
            .execute(&self.pool)
            .await
            .map_err(transport)?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), GatewayError> {
        let uuid = parse_id(id).ok_or_else(|| GatewayError::NotFound(id.to_string()))?;

        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(transport)?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

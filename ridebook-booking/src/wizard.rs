use chrono::NaiveDate;
use ridebook_catalog::{Route, RouteId};
use ridebook_core::{Booking, BookingStatus, BookingStore, FieldErrors, GatewayError, NewBooking, Owner, Passenger};
use ridebook_shared::Masked;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

use crate::seat_selector::SeatSelector;

/// The four steps of the booking flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DateTime,
    Seats,
    PassengerDetails,
    Review,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::DateTime, Stage::Seats, Stage::PassengerDetails, Stage::Review];

    /// 1-based position shown in the progress indicator
    pub fn index(&self) -> u8 {
        match self {
            Stage::DateTime => 1,
            Stage::Seats => 2,
            Stage::PassengerDetails => 3,
            Stage::Review => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.index() == index)
    }

    pub fn next(&self) -> Option<Stage> {
        Stage::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<Stage> {
        self.index().checked_sub(1).and_then(Stage::from_index)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::DateTime => "Select Date & Time",
            Stage::Seats => "Choose Seats",
            Stage::PassengerDetails => "Passenger Details",
            Stage::Review => "Review & Confirm",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.title())
    }
}

/// Upper bound accepted for a passenger's age
pub const MAX_PASSENGER_AGE: u32 = 120;

/// Passenger fields as typed into the form; checked by the stage-3 predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl PassengerForm {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.age.is_some() && !self.phone.trim().is_empty()
    }

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        match self.age {
            Some(0) => errors.add("age", "Age must be a positive number"),
            Some(age) if age > MAX_PASSENGER_AGE => {
                errors.add("age", format!("Age must be at most {}", MAX_PASSENGER_AGE))
            }
            _ => {}
        }
        errors.into_result()
    }

    fn to_passenger(&self) -> Option<Passenger> {
        let age = self.age?;
        let email = self.email.trim();
        Some(Passenger {
            name: self.name.trim().to_string(),
            age,
            phone: Masked::new(self.phone.trim().to_string()),
            email: (!email.is_empty()).then(|| email.to_string()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{field} can only be changed at stage {expected}, wizard is at stage {current}")]
    WrongStage {
        field: &'static str,
        expected: Stage,
        current: Stage,
    },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Booking can only be submitted from the review stage (currently at stage {0})")]
    NotAtReview(Stage),

    #[error("Stage {0} is incomplete")]
    Incomplete(Stage),

    #[error("Booking could not be saved: {0}")]
    Gateway(#[from] GatewayError),
}

/// One booking attempt against a single route.
///
/// Lives only as long as the attempt: never persisted, dropped by the owner once
/// `submit` succeeds.
#[derive(Debug, Clone)]
pub struct WizardSession {
    route: Route,
    today: NaiveDate,
    stage: Stage,
    journey_date: Option<NaiveDate>,
    departure_time: Option<String>,
    passenger: PassengerForm,
    seats: SeatSelector,
}

impl WizardSession {
    /// `taken` is the inventory snapshot for this attempt; `today` is the earliest bookable date
    pub fn new(route: Route, taken: BTreeSet<u32>, today: NaiveDate) -> Self {
        let seats = SeatSelector::new(route.total_seats, taken);
        Self {
            route,
            today,
            stage: Stage::DateTime,
            journey_date: None,
            departure_time: None,
            passenger: PassengerForm::default(),
            seats,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn journey_date(&self) -> Option<NaiveDate> {
        self.journey_date
    }

    pub fn departure_time(&self) -> Option<&str> {
        self.departure_time.as_deref()
    }

    pub fn passenger(&self) -> &PassengerForm {
        &self.passenger
    }

    pub fn seats(&self) -> &SeatSelector {
        &self.seats
    }

    pub fn total_price(&self) -> u64 {
        self.route.fare_for(self.seats.len())
    }

    fn require_stage(&self, field: &'static str, expected: Stage) -> Result<(), WizardError> {
        if self.stage != expected {
            return Err(WizardError::WrongStage { field, expected, current: self.stage });
        }
        Ok(())
    }

    pub fn set_journey_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.require_stage("date", Stage::DateTime)?;
        if date < self.today {
            return Err(WizardError::Validation(FieldErrors::single(
                "date",
                "Journey date cannot be in the past",
            )));
        }
        self.journey_date = Some(date);
        Ok(())
    }

    pub fn select_departure(&mut self, time: &str) -> Result<(), WizardError> {
        self.require_stage("departure_time", Stage::DateTime)?;
        if !self.route.is_permitted_departure(time) {
            return Err(WizardError::Validation(FieldErrors::single(
                "departure_time",
                format!("{} is not a departure time of {}", time, self.route.name),
            )));
        }
        self.departure_time = Some(time.to_string());
        Ok(())
    }

    /// Returns the new selection when it changed; taken seats are ignored silently
    pub fn toggle_seat(&mut self, seat: u32) -> Result<Option<&BTreeSet<u32>>, WizardError> {
        self.require_stage("seats", Stage::Seats)?;
        Ok(self.seats.toggle(seat))
    }

    /// Reload taken seats once the journey date is known
    pub fn refresh_taken_seats(&mut self, taken: BTreeSet<u32>) -> Vec<u32> {
        let dropped = self.seats.replace_taken(taken);
        if !dropped.is_empty() {
            warn!("Seats {:?} on {} were taken meanwhile and left the selection", dropped, self.route.id);
        }
        dropped
    }

    pub fn update_passenger(&mut self, form: PassengerForm) -> Result<(), WizardError> {
        self.require_stage("passenger", Stage::PassengerDetails)?;
        form.validate().map_err(WizardError::Validation)?;
        self.passenger = form;
        Ok(())
    }

    /// Whether the "continue" action of `stage` is enabled.
    ///
    /// The review stage is always submit-eligible: earlier predicates are not re-checked there.
    pub fn can_proceed(&self, stage: Stage) -> bool {
        match stage {
            Stage::DateTime => {
                self.journey_date.is_some()
                    && self
                        .departure_time
                        .as_deref()
                        .is_some_and(|t| self.route.is_permitted_departure(t))
            }
            Stage::Seats => !self.seats.is_empty(),
            Stage::PassengerDetails => self.passenger.is_complete(),
            Stage::Review => true,
        }
    }

    /// Move forward when the current stage is complete. Returns whether the stage changed.
    pub fn advance(&mut self) -> bool {
        match self.stage.next() {
            Some(next) if self.can_proceed(self.stage) => {
                self.stage = next;
                true
            }
            _ => false,
        }
    }

    /// Move back one stage, keeping everything entered so far
    pub fn back(&mut self) -> bool {
        match self.stage.previous() {
            Some(previous) => {
                self.stage = previous;
                true
            }
            None => false,
        }
    }

    /// Assemble the record that `submit` would create
    pub fn draft(&self, owner: Owner) -> Result<NewBooking, WizardError> {
        if self.stage != Stage::Review {
            return Err(WizardError::NotAtReview(self.stage));
        }

        let journey_date = self.journey_date.ok_or(WizardError::Incomplete(Stage::DateTime))?;
        let departure_time = self.departure_time.clone().ok_or(WizardError::Incomplete(Stage::DateTime))?;
        if self.seats.is_empty() {
            return Err(WizardError::Incomplete(Stage::Seats));
        }
        let passenger = self
            .passenger
            .to_passenger()
            .ok_or(WizardError::Incomplete(Stage::PassengerDetails))?;

        Ok(NewBooking {
            route_id: self.route.id.clone(),
            route_name: self.route.name.clone(),
            owner,
            passenger,
            seats: self.seats.seat_numbers(),
            price: self.total_price(),
            journey_date,
            departure_time,
            status: BookingStatus::Pending,
        })
    }

    /// Create the booking through the store.
    ///
    /// The session is left untouched either way; the caller drops it on success and keeps it
    /// for a manual retry on failure.
    pub async fn submit(&self, store: &dyn BookingStore, owner: Owner) -> Result<Booking, WizardError> {
        let draft = self.draft(owner)?;

        match store.create(draft).await {
            Ok(booking) => {
                info!(
                    "Booking {} created on {} for seats {:?} (total {})",
                    booking.id, booking.route_id, booking.seats, booking.price
                );
                Ok(booking)
            }
            Err(e) => {
                warn!("Booking submission for route {} failed: {}", self.route.id, e);
                Err(WizardError::Gateway(e))
            }
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            route_id: self.route.id.clone(),
            route_name: self.route.name.clone(),
            stage: self.stage,
            stage_index: self.stage.index(),
            journey_date: self.journey_date,
            departure_time: self.departure_time.clone(),
            selected_seats: self.seats.seat_numbers(),
            taken_seats: self.seats.taken().iter().copied().collect(),
            passenger: self.passenger.clone(),
            price_per_seat: self.route.price,
            total_price: self.total_price(),
            can_proceed: self.can_proceed(self.stage),
        }
    }
}

/// Read model of a session for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub route_id: RouteId,
    pub route_name: String,
    pub stage: Stage,
    pub stage_index: u8,
    pub journey_date: Option<NaiveDate>,
    pub departure_time: Option<String>,
    pub selected_seats: Vec<u32>,
    pub taken_seats: Vec<u32>,
    pub passenger: PassengerForm,
    pub price_per_seat: u32,
    pub total_price: u64,
    pub can_proceed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{demo_taken, erode_express, RecordingStore};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 5, 1).unwrap()
    }

    fn new_session() -> WizardSession {
        WizardSession::new(erode_express(), demo_taken(), today())
    }

    fn filled_to_review() -> WizardSession {
        let mut session = new_session();
        session.set_journey_date(today()).unwrap();
        session.select_departure("06:00 AM").unwrap();
        assert!(session.advance());
        session.toggle_seat(7).unwrap();
        session.toggle_seat(8).unwrap();
        session.toggle_seat(9).unwrap();
        assert!(session.advance());
        session
            .update_passenger(PassengerForm {
                name: "A".to_string(),
                age: Some(30),
                phone: "9999999999".to_string(),
                email: String::new(),
            })
            .unwrap();
        assert!(session.advance());
        session
    }

    #[test]
    fn test_stage_one_predicate() {
        let mut session = new_session();
        assert!(!session.can_proceed(Stage::DateTime));

        session.set_journey_date(today()).unwrap();
        assert!(!session.can_proceed(Stage::DateTime), "date set, time empty");

        session.select_departure("09:30 AM").unwrap();
        assert!(session.can_proceed(Stage::DateTime));
    }

    #[test]
    fn test_time_without_date_cannot_proceed() {
        let mut session = new_session();
        session.select_departure("09:30 AM").unwrap();
        assert!(!session.can_proceed(Stage::DateTime));
        assert!(!session.advance());
        assert_eq!(session.stage(), Stage::DateTime);
    }

    #[test]
    fn test_rejects_past_date_and_unknown_departure() {
        let mut session = new_session();
        let yesterday = today().pred_opt().unwrap();

        assert!(matches!(session.set_journey_date(yesterday), Err(WizardError::Validation(_))));
        assert!(matches!(session.select_departure("07:00 AM"), Err(WizardError::Validation(_))));
        assert!(session.journey_date().is_none());
        assert!(session.departure_time().is_none());
    }

    #[test]
    fn test_setters_bound_to_their_stage() {
        let mut session = new_session();
        let err = session.toggle_seat(8).unwrap_err();
        assert!(matches!(
            err,
            WizardError::WrongStage { expected: Stage::Seats, current: Stage::DateTime, .. }
        ));
        assert!(matches!(
            session.update_passenger(PassengerForm::default()),
            Err(WizardError::WrongStage { .. })
        ));
    }

    #[test]
    fn test_seat_stage_gating_and_price() {
        let mut session = new_session();
        session.set_journey_date(today()).unwrap();
        session.select_departure("06:00 AM").unwrap();
        assert!(session.advance());

        assert!(!session.advance(), "no seats selected");
        session.toggle_seat(3).unwrap();
        session.toggle_seat(4).unwrap();
        session.toggle_seat(5).unwrap();
        assert_eq!(session.total_price(), 750);
        assert!(session.advance());
        assert_eq!(session.stage(), Stage::PassengerDetails);
    }

    #[test]
    fn test_passenger_predicate_ignores_email() {
        let mut form = PassengerForm {
            name: "A".to_string(),
            age: Some(30),
            phone: "9999999999".to_string(),
            email: String::new(),
        };
        assert!(form.is_complete());

        form.name = "   ".to_string();
        assert!(!form.is_complete());

        form.name = "A".to_string();
        form.age = None;
        assert!(!form.is_complete());
    }

    #[test]
    fn test_back_keeps_entered_data() {
        let mut session = filled_to_review();
        assert!(session.back());
        assert!(session.back());
        assert!(session.back());
        assert!(!session.back());

        assert_eq!(session.stage(), Stage::DateTime);
        assert_eq!(session.departure_time(), Some("06:00 AM"));
        assert_eq!(session.seats().seat_numbers(), vec![8, 9]);
        assert_eq!(session.passenger().name, "A");

        assert!(session.advance());
        assert!(session.advance());
        assert!(session.advance());
        assert_eq!(session.stage(), Stage::Review);
    }

    #[tokio::test]
    async fn test_end_to_end_submission() {
        let session = filled_to_review();
        let store = RecordingStore::default();

        let booking = session.submit(&store, Owner::Guest).await.unwrap();

        assert_eq!(booking.seats, vec![8, 9]);
        assert_eq!(booking.price, 500);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.owner, Owner::Guest);
        assert_eq!(booking.route_name, "CBE - Erode Express");
        assert_eq!(booking.passenger.email, None);
        assert_eq!(store.created().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_never_reaches_store() {
        let mut session = new_session();
        session.set_journey_date(today()).unwrap();
        session.select_departure("06:00 AM").unwrap();
        session.advance();
        session.toggle_seat(8).unwrap();
        session.advance();
        session
            .update_passenger(PassengerForm {
                name: String::new(),
                age: Some(30),
                phone: "9999999999".to_string(),
                email: String::new(),
            })
            .unwrap();
        assert!(!session.advance());

        let store = RecordingStore::default();
        let err = session.submit(&store, Owner::Guest).await.unwrap_err();
        assert!(matches!(err, WizardError::NotAtReview(Stage::PassengerDetails)));
        assert!(store.created().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_session() {
        let session = filled_to_review();
        let store = RecordingStore::failing();

        let err = session.submit(&store, Owner::Guest).await.unwrap_err();
        assert!(matches!(err, WizardError::Gateway(GatewayError::Transport(_))));

        assert_eq!(session.stage(), Stage::Review);
        assert_eq!(session.seats().seat_numbers(), vec![8, 9]);
        assert!(store.created().is_empty());

        // the user re-triggers submit once the store is reachable again
        let store = RecordingStore::default();
        assert!(session.submit(&store, Owner::Guest).await.is_ok());
    }

    #[test]
    fn test_review_stage_is_not_revalidated() {
        // A session opened yesterday reaches review with yesterday's date; nothing re-checks
        // it against the current day before drafting.
        let yesterday = today().pred_opt().unwrap();
        let mut session = WizardSession::new(erode_express(), demo_taken(), yesterday);
        session.set_journey_date(yesterday).unwrap();
        session.select_departure("06:00 AM").unwrap();
        session.advance();
        session.toggle_seat(1).unwrap();
        session.advance();
        session
            .update_passenger(PassengerForm {
                name: "B".to_string(),
                age: Some(41),
                phone: "8888888888".to_string(),
                email: "b@example.com".to_string(),
            })
            .unwrap();
        session.advance();

        assert!(session.can_proceed(Stage::Review));
        let draft = session.draft(Owner::Guest).unwrap();
        assert!(draft.journey_date < today());
        assert_eq!(draft.passenger.email.as_deref(), Some("b@example.com"));
    }

    #[test]
    fn test_passenger_age_bounds() {
        let mut session = new_session();
        session.set_journey_date(today()).unwrap();
        session.select_departure("06:00 AM").unwrap();
        session.advance();
        session.toggle_seat(2).unwrap();
        session.advance();

        let form = |age| PassengerForm {
            name: "C".to_string(),
            age: Some(age),
            phone: "7777777777".to_string(),
            email: String::new(),
        };

        for age in [0, MAX_PASSENGER_AGE + 1, u32::MAX] {
            match session.update_passenger(form(age)) {
                Err(WizardError::Validation(fields)) => assert!(fields.get("age").is_some()),
                other => panic!("age {} accepted: {:?}", age, other),
            }
        }
        assert!(session.passenger().age.is_none());

        session.update_passenger(form(MAX_PASSENGER_AGE)).unwrap();
        assert_eq!(session.passenger().age, Some(MAX_PASSENGER_AGE));
    }

    #[test]
    fn test_refresh_drops_newly_taken_seats() {
        let mut session = filled_to_review();
        let dropped = session.refresh_taken_seats([9, 10].into_iter().collect());

        assert_eq!(dropped, vec![9]);
        assert_eq!(session.seats().seat_numbers(), vec![8]);
        assert_eq!(session.total_price(), 250);
    }

    #[test]
    fn test_snapshot_serialization() {
        let json = serde_json::to_value(filled_to_review().snapshot()).unwrap();
        assert_eq!(json["stage"], "review");
        assert_eq!(json["stage_index"], 4);
        assert_eq!(json["taken_seats"], serde_json::json!([7, 14, 21, 28, 35]));
        assert_eq!(json["can_proceed"], true);
    }

    #[test]
    fn test_stage_navigation_helpers() {
        assert_eq!(Stage::DateTime.next(), Some(Stage::Seats));
        assert_eq!(Stage::Review.next(), None);
        assert_eq!(Stage::DateTime.previous(), None);
        assert_eq!(Stage::from_index(3), Some(Stage::PassengerDetails));
        assert_eq!(Stage::from_index(0), None);
    }
}

//! Process-local gateways used in development and tests

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::RngCore;
use ridebook_catalog::RouteId;
use ridebook_core::auth::{self as auth_rules, AuthError, MIN_PASSWORD_LEN};
use ridebook_core::{
    AuthGateway, Booking, BookingId, BookingPatch, BookingStore, GatewayError, Identity, NewBooking, Owner,
    Profile, SeatInventory, UserId,
};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookings
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<Booking, GatewayError> {
        let booking = Booking::from_new(BookingId(Uuid::new_v4().to_string()), booking, Utc::now());
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, GatewayError> {
        Ok(self.bookings.read().await.iter().find(|b| &b.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, GatewayError> {
        Ok(newest_first(self.bookings.read().await.clone()))
    }

    async fn list_by_owner(&self, owner: &Owner) -> Result<Vec<Booking>, GatewayError> {
        let owned = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| &b.owner == owner)
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    async fn update(&self, id: &BookingId, patch: BookingPatch) -> Result<(), GatewayError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        patch.apply(booking);
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), GatewayError> {
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|b| &b.id != id);
        if bookings.len() == before {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

struct Account {
    uid: UserId,
    salt: [u8; 16],
    digest: String,
    profile: Profile,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.profile.email.clone(),
            is_admin: self.profile.is_admin,
        }
    }
}

fn password_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Default)]
struct AuthState {
    /// keyed by lowercased email
    accounts: HashMap<String, Account>,
    signed_in: HashSet<UserId>,
}

/// Email/password accounts with salted SHA-256 digests and a signed-in set
#[derive(Default)]
pub struct InMemoryAuthGateway {
    admin_emails: HashSet<String>,
    state: RwLock<AuthState>,
}

impl InMemoryAuthGateway {
    pub fn new(admin_emails: impl IntoIterator<Item = String>) -> Self {
        Self {
            admin_emails: admin_emails.into_iter().map(|e| e.to_lowercase()).collect(),
            state: RwLock::default(),
        }
    }

    pub async fn profile(&self, uid: &UserId) -> Option<Profile> {
        let state = self.state.read().await;
        state.accounts.values().find(|a| &a.uid == uid).map(|a| a.profile.clone())
    }
}

#[async_trait]
impl AuthGateway for InMemoryAuthGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if !auth_rules::is_valid_email(email) {
            return Err(AuthError::invalid_email());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::weak_password());
        }

        let key = email.trim().to_lowercase();
        let mut state = self.state.write().await;
        if state.accounts.contains_key(&key) {
            return Err(AuthError::email_already_in_use());
        }

        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);

        let mut profile = Profile::new(email.trim());
        profile.is_admin = self.admin_emails.contains(&key);

        let account = Account {
            uid: UserId(Uuid::new_v4().to_string()),
            salt,
            digest: password_digest(&salt, password),
            profile,
        };
        let identity = account.identity();

        state.signed_in.insert(identity.uid.clone());
        state.accounts.insert(key, account);
        info!("Account {} created (admin: {})", identity.uid, identity.is_admin);
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let key = email.trim().to_lowercase();
        let mut state = self.state.write().await;

        let identity = {
            let account = state.accounts.get(&key).ok_or_else(AuthError::user_not_found)?;
            if password_digest(&account.salt, password) != account.digest {
                return Err(AuthError::wrong_password());
            }
            account.identity()
        };

        state.signed_in.insert(identity.uid.clone());
        info!("User {} signed in", identity.uid);
        Ok(identity)
    }

    async fn sign_out(&self, uid: &UserId) -> Result<(), AuthError> {
        self.state.write().await.signed_in.remove(uid);
        info!("User {} signed out", uid);
        Ok(())
    }

    async fn current_identity(&self, uid: &UserId) -> Result<Option<Identity>, AuthError> {
        let state = self.state.read().await;
        if !state.signed_in.contains(uid) {
            return Ok(None);
        }
        Ok(state.accounts.values().find(|a| &a.uid == uid).map(Account::identity))
    }
}

/// Same taken seats for every route and day
#[derive(Debug, Clone, Default)]
pub struct StaticSeatInventory {
    taken: BTreeSet<u32>,
}

impl StaticSeatInventory {
    pub fn new(taken: impl IntoIterator<Item = u32>) -> Self {
        Self { taken: taken.into_iter().collect() }
    }
}

#[async_trait]
impl SeatInventory for StaticSeatInventory {
    async fn taken_seats(&self, _route: &RouteId, _date: NaiveDate) -> Result<BTreeSet<u32>, GatewayError> {
        Ok(self.taken.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridebook_core::auth::{EMAIL_ALREADY_IN_USE, USER_NOT_FOUND, WEAK_PASSWORD, WRONG_PASSWORD};
    use ridebook_core::{BookingStatus, Passenger};
    use ridebook_shared::Masked;

    fn new_booking(owner: Owner) -> NewBooking {
        NewBooking {
            route_id: RouteId::from("r1"),
            route_name: "CBE - Erode Express".to_string(),
            owner,
            passenger: Passenger {
                name: "A".to_string(),
                age: 30,
                phone: Masked::new("9999999999".to_string()),
                email: None,
            },
            seats: vec![8, 9],
            price: 500,
            journey_date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            departure_time: "06:00 AM".to_string(),
            status: BookingStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_booking_lifecycle() {
        let store = InMemoryBookingStore::new();
        let created = store.create(new_booking(Owner::Guest)).await.unwrap();

        assert_eq!(store.get(&created.id).await.unwrap(), Some(created.clone()));

        store
            .update(&created.id, BookingPatch::status(BookingStatus::Confirmed))
            .await
            .unwrap();
        let fetched = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, BookingStatus::Confirmed);

        store.delete(&created.id).await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_booking_is_not_found() {
        let store = InMemoryBookingStore::new();
        let id = BookingId::from("nope");

        assert!(matches!(
            store.update(&id, BookingPatch::status(BookingStatus::Cancelled)).await,
            Err(GatewayError::NotFound(_))
        ));
        assert!(matches!(store.delete(&id).await, Err(GatewayError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let store = InMemoryBookingStore::new();
        let alice = Owner::User(UserId::from("alice"));

        let first = store.create(new_booking(alice.clone())).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(new_booking(alice.clone())).await.unwrap();
        store.create(new_booking(Owner::Guest)).await.unwrap();

        let ids: Vec<BookingId> = store
            .list_by_owner(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_and_out() {
        let auth = InMemoryAuthGateway::new(vec!["admin@ridebook.in".to_string()]);

        let user = auth.sign_up("rider@example.com", "secret1").await.unwrap();
        assert!(!user.is_admin);
        assert_eq!(auth.current_identity(&user.uid).await.unwrap(), Some(user.clone()));

        auth.sign_out(&user.uid).await.unwrap();
        assert_eq!(auth.current_identity(&user.uid).await.unwrap(), None);

        let again = auth.sign_in("Rider@Example.com", "secret1").await.unwrap();
        assert_eq!(again.uid, user.uid);

        let profile = auth.profile(&user.uid).await.unwrap();
        assert_eq!(profile.email, "rider@example.com");
        assert!(!profile.is_admin);
    }

    #[tokio::test]
    async fn test_auth_error_codes() {
        let auth = InMemoryAuthGateway::new(Vec::new());
        auth.sign_up("rider@example.com", "secret1").await.unwrap();

        let dup = auth.sign_up("rider@example.com", "secret1").await.unwrap_err();
        assert_eq!(dup.code, EMAIL_ALREADY_IN_USE);

        let weak = auth.sign_up("new@example.com", "123").await.unwrap_err();
        assert_eq!(weak.code, WEAK_PASSWORD);

        let missing = auth.sign_in("ghost@example.com", "secret1").await.unwrap_err();
        assert_eq!(missing.code, USER_NOT_FOUND);

        let wrong = auth.sign_in("rider@example.com", "secret2").await.unwrap_err();
        assert_eq!(wrong.code, WRONG_PASSWORD);
    }

    #[tokio::test]
    async fn test_admin_emails_get_admin_profile() {
        let auth = InMemoryAuthGateway::new(vec!["Admin@RideBook.in".to_string()]);
        let admin = auth.sign_up("admin@ridebook.in", "secret1").await.unwrap();
        assert!(admin.is_admin);
    }
}

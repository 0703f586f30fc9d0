use ridebook_core::{Booking, BookingStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Status filter used by both the dashboard tabs and the admin table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Pending or confirmed
    Upcoming,
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Upcoming => booking.is_upcoming(),
            StatusFilter::Pending => booking.status == BookingStatus::Pending,
            StatusFilter::Confirmed => booking.status == BookingStatus::Confirmed,
            StatusFilter::Cancelled => booking.status == BookingStatus::Cancelled,
            StatusFilter::Completed => booking.status == BookingStatus::Completed,
        }
    }
}

impl From<BookingStatus> for StatusFilter {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => StatusFilter::Pending,
            BookingStatus::Confirmed => StatusFilter::Confirmed,
            BookingStatus::Cancelled => StatusFilter::Cancelled,
            BookingStatus::Completed => StatusFilter::Completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "upcoming" => Ok(StatusFilter::Upcoming),
            other => BookingStatus::from_str(other).map(StatusFilter::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first
    #[default]
    Date,
    /// Most expensive first
    Price,
    /// Status name, alphabetical
    Status,
}

impl SortKey {
    fn compare(&self, a: &Booking, b: &Booking) -> Ordering {
        match self {
            SortKey::Date => b.created_at.cmp(&a.created_at),
            SortKey::Price => b.price.cmp(&a.price),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

fn matches_search(booking: &Booking, needle: &str) -> bool {
    [
        booking.route_name.as_str(),
        booking.passenger.name.as_str(),
        booking.passenger.phone.reveal().as_str(),
        booking.id.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Filter, search, then sort. Pure; ties keep their input order.
///
/// `search` is the admin free-text box; blank means no search.
pub fn apply(records: &[Booking], filter: StatusFilter, search: Option<&str>, sort: SortKey) -> Vec<Booking> {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

    let mut result: Vec<Booking> = records
        .iter()
        .filter(|b| filter.matches(b))
        .filter(|b| needle.as_deref().map_or(true, |n| matches_search(b, n)))
        .cloned()
        .collect();

    result.sort_by(|a, b| sort.compare(a, b));
    result
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    /// Sum over confirmed bookings only
    pub revenue: u64,
}

impl AdminStats {
    pub fn from_bookings(records: &[Booking]) -> Self {
        records.iter().fold(
            AdminStats { total: records.len(), ..Default::default() },
            |mut stats, b| {
                match b.status {
                    BookingStatus::Pending => stats.pending += 1,
                    BookingStatus::Confirmed => {
                        stats.confirmed += 1;
                        stats.revenue += b.price;
                    }
                    BookingStatus::Cancelled => stats.cancelled += 1,
                    BookingStatus::Completed => {}
                }
                stats
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub active: usize,
    pub spent: u64,
}

impl DashboardStats {
    pub fn from_bookings(records: &[Booking]) -> Self {
        DashboardStats {
            total: records.len(),
            confirmed: records.iter().filter(|b| b.status == BookingStatus::Confirmed).count(),
            cancelled: records.iter().filter(|b| b.status == BookingStatus::Cancelled).count(),
            active: records.iter().filter(|b| b.is_upcoming()).count(),
            spent: records.iter().map(|b| b.price).sum(),
        }
    }
}

use ridebook_core::{Booking, BookingId, BookingPatch, BookingStatus, BookingStore, GatewayError};
use serde::Serialize;
use tracing::{info, warn};

/// Answer to the "are you sure?" prompt shown before destructive actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Accepted,
    Dismissed,
}

impl From<bool> for Prompt {
    fn from(acknowledged: bool) -> Self {
        if acknowledged {
            Prompt::Accepted
        } else {
            Prompt::Dismissed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Confirm,
    Cancel,
    Delete,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Confirm => "confirm",
            AdminAction::Cancel => "cancel",
            AdminAction::Delete => "delete",
        }
    }
}

/// What an admin mutation did. Nothing is applied locally unless the store accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    StatusChanged { id: BookingId, status: BookingStatus },
    Deleted { id: BookingId },
    /// Acknowledgment was not given; the store was never called
    Declined { id: BookingId },
    Failed { id: BookingId, error: GatewayError },
}

impl MutationOutcome {
    pub fn id(&self) -> &BookingId {
        match self {
            MutationOutcome::StatusChanged { id, .. }
            | MutationOutcome::Deleted { id }
            | MutationOutcome::Declined { id }
            | MutationOutcome::Failed { id, .. } => id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MutationOutcome::StatusChanged { .. } => "status_changed",
            MutationOutcome::Deleted { .. } => "deleted",
            MutationOutcome::Declined { .. } => "declined",
            MutationOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::StatusChanged { .. } | MutationOutcome::Deleted { .. })
    }

    /// Toast text for the admin table
    pub fn notice(&self) -> String {
        match self {
            MutationOutcome::StatusChanged { status, .. } => format!("Booking {}", status),
            MutationOutcome::Deleted { .. } => "Booking deleted".to_string(),
            MutationOutcome::Declined { .. } => "No changes made".to_string(),
            MutationOutcome::Failed { error, .. } => format!("Update failed: {}", error),
        }
    }
}

async fn set_status(store: &dyn BookingStore, id: &BookingId, status: BookingStatus) -> MutationOutcome {
    match store.update(id, BookingPatch::status(status)).await {
        Ok(()) => {
            info!("Booking {} marked {}", id, status);
            MutationOutcome::StatusChanged { id: id.clone(), status }
        }
        Err(e) => {
            warn!("Failed to mark booking {} {}: {}", id, status, e);
            MutationOutcome::Failed { id: id.clone(), error: e }
        }
    }
}

pub async fn confirm(store: &dyn BookingStore, id: &BookingId) -> MutationOutcome {
    set_status(store, id, BookingStatus::Confirmed).await
}

pub async fn cancel(store: &dyn BookingStore, id: &BookingId, prompt: Prompt) -> MutationOutcome {
    if prompt == Prompt::Dismissed {
        return MutationOutcome::Declined { id: id.clone() };
    }
    set_status(store, id, BookingStatus::Cancelled).await
}

pub async fn delete(store: &dyn BookingStore, id: &BookingId, prompt: Prompt) -> MutationOutcome {
    if prompt == Prompt::Dismissed {
        return MutationOutcome::Declined { id: id.clone() };
    }
    match store.delete(id).await {
        Ok(()) => {
            info!("Booking {} deleted", id);
            MutationOutcome::Deleted { id: id.clone() }
        }
        Err(e) => {
            warn!("Failed to delete booking {}: {}", id, e);
            MutationOutcome::Failed { id: id.clone(), error: e }
        }
    }
}

/// Locally held copy of the admin table
#[derive(Debug, Clone, Default)]
pub struct BookingBoard {
    bookings: Vec<Booking>,
}

impl BookingBoard {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self { bookings }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Reflect a successful outcome. Returns whether the board changed.
    pub fn apply(&mut self, outcome: &MutationOutcome) -> bool {
        match outcome {
            MutationOutcome::StatusChanged { id, status } => {
                match self.bookings.iter_mut().find(|b| &b.id == id) {
                    Some(booking) => {
                        booking.status = *status;
                        true
                    }
                    None => false,
                }
            }
            MutationOutcome::Deleted { id } => {
                let before = self.bookings.len();
                self.bookings.retain(|b| &b.id != id);
                self.bookings.len() != before
            }
            MutationOutcome::Declined { .. } | MutationOutcome::Failed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking, RecordingStore};

    fn board() -> BookingBoard {
        BookingBoard::new(vec![
            booking("a", BookingStatus::Pending, 250, 1),
            booking("b", BookingStatus::Pending, 500, 2),
        ])
    }

    #[tokio::test]
    async fn test_confirm_updates_board_after_store() {
        let store = RecordingStore::default();
        let mut board = board();
        let id = BookingId::from("a");

        let outcome = confirm(&store, &id).await;
        assert_eq!(outcome, MutationOutcome::StatusChanged { id: id.clone(), status: BookingStatus::Confirmed });
        assert!(board.apply(&outcome));

        assert_eq!(board.bookings()[0].status, BookingStatus::Confirmed);
        assert_eq!(store.patches(), vec![(id, BookingPatch::status(BookingStatus::Confirmed))]);
        assert_eq!(outcome.notice(), "Booking confirmed");
    }

    #[tokio::test]
    async fn test_dismissed_prompt_skips_store() {
        let store = RecordingStore::default();
        let id = BookingId::from("b");

        let cancelled = cancel(&store, &id, Prompt::Dismissed).await;
        let deleted = delete(&store, &id, Prompt::from(false)).await;

        assert_eq!(cancelled, MutationOutcome::Declined { id: id.clone() });
        assert_eq!(deleted.label(), "declined");
        assert!(store.patches().is_empty());
        assert!(store.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_failure_leaves_board_untouched() {
        let store = RecordingStore::failing();
        let mut board = board();
        let id = BookingId::from("b");

        let outcome = cancel(&store, &id, Prompt::Accepted).await;
        assert!(matches!(outcome, MutationOutcome::Failed { .. }));
        assert!(!outcome.is_success());
        assert!(!board.apply(&outcome));
        assert_eq!(board.bookings()[1].status, BookingStatus::Pending);
        assert!(outcome.notice().starts_with("Update failed"));
    }

    #[tokio::test]
    async fn test_delete_removes_from_board() {
        let store = RecordingStore::default();
        let mut board = board();
        let id = BookingId::from("a");

        let outcome = delete(&store, &id, Prompt::Accepted).await;
        assert!(board.apply(&outcome));
        assert_eq!(board.bookings().len(), 1);
        assert_eq!(store.deleted(), vec![id]);
    }
}

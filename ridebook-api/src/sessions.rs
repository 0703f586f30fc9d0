use ridebook_booking::WizardSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<WizardSession>>;

struct Entry {
    session: SharedSession,
    touched: Instant,
}

/// Open booking attempts, keyed by a random session id.
///
/// Each session has its own lock so requests against one session run one at a time. A session
/// not touched for `ttl` counts as abandoned and is dropped.
#[derive(Clone)]
pub struct WizardRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl WizardRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub async fn open(&self, session: WizardSession) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, e| now.duration_since(e.touched) < self.ttl);
        sessions.insert(
            id,
            Entry {
                session: Arc::new(Mutex::new(session)),
                touched: now,
            },
        );
        id
    }

    /// Looks the session up and refreshes its expiry
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = now.duration_since(sessions.get(id)?.touched) >= self.ttl;
        if expired {
            sessions.remove(id);
            debug!("Booking session {} expired", id);
            return None;
        }

        let entry = sessions.get_mut(id)?;
        entry.touched = now;
        Some(entry.session.clone())
    }

    pub async fn discard(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every expired session; returns how many were removed
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, e| now.duration_since(e.touched) < self.ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Periodic sweep so abandoned sessions go away even when no new ones are opened
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = registry.sweep().await;
                if removed > 0 {
                    debug!("Swept {} abandoned booking sessions", removed);
                }
            }
        })
    }
}

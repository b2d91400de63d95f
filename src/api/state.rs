use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::models::Catalog;
use crate::services::{FeedSession, FeedSettings, FocusTimers};

/// Sessions untouched for this long are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A live session plus its dwell timer
#[derive(Debug)]
pub struct SessionEntry {
    pub session: FeedSession,
    pub timers: FocusTimers,
    last_active: Instant,
}

impl SessionEntry {
    pub fn new(session: FeedSession) -> Self {
        Self {
            session,
            timers: FocusTimers::new(),
            last_active: Instant::now(),
        }
    }

    /// Marks the session as used by the viewer
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub settings: Arc<FeedSettings>,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    pub idle_timeout: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::builtin()), FeedSettings::default())
    }
}

impl AppState {
    /// Creates application state with no sessions
    pub fn new(catalog: Arc<Catalog>, settings: FeedSettings) -> Self {
        Self {
            catalog,
            settings: Arc::new(settings),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Drops sessions idle past the timeout, returning how many went.
    /// Dropping an entry aborts its pending dwell timer.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.idle_for() < self.idle_timeout);
        let evicted = before - sessions.len();

        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Runs `evict_idle` on a fixed interval in the background
    pub fn spawn_eviction(&self, every: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                state.evict_idle().await;
            }
        })
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::data::DataContext;
use crate::services::providers::{tmdb::TmdbSettings, MetadataProvider, TmdbProvider};
use crate::services::{MetadataClient, Recommender, SessionController, SessionState};

/// Idle time after which a session is evicted, unless configured otherwise
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// How often the background sweep looks for idle sessions
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-memory session map with idle expiry
///
/// A session whose state has not changed for longer than the TTL is treated as gone:
/// it is removed on its next access, or by the periodic sweep, whichever comes first.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, id: Uuid, session: SessionState) {
        self.sessions.write().await.insert(id, session);
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionState> {
        self.sessions.write().await.remove(&id)
    }

    /// Runs `f` against a live session; `None` when it is missing or expired
    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;

        if sessions.get(&id)?.is_expired(Utc::now(), self.ttl) {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Session expired");
            return None;
        }

        sessions.get_mut(&id).map(f)
    }

    /// Drops every expired session, returning how many were removed
    pub async fn evict_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        before - sessions.len()
    }

    /// Spawns a background task that periodically evicts expired sessions
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = self.clone();
        let every = SWEEP_INTERVAL.min(self.ttl.max(Duration::from_secs(1)));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_expired().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle sessions");
                }
            }
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: SessionController,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires the recommender and metadata client around an explicit data context
    pub fn new(
        data: Arc<DataContext>,
        provider: Arc<dyn MetadataProvider>,
        recommendation_count: usize,
    ) -> Self {
        let recommender = Arc::new(Recommender::new(data));
        let metadata = MetadataClient::new(provider);

        Self {
            controller: SessionController::new(recommender, metadata, recommendation_count),
            sessions: SessionStore::new(DEFAULT_SESSION_TTL),
        }
    }

    /// Replaces the session store with an empty one using `ttl`
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = SessionStore::new(ttl);
        self
    }

    /// Builds the state used by the server binary
    pub fn from_config(config: &Config, data: DataContext) -> Self {
        let provider = TmdbProvider::new(TmdbSettings::from(config));
        Self::new(Arc::new(data), Arc::new(provider), config.recommendation_count)
            .with_session_ttl(config.session_ttl())
    }

    pub fn data(&self) -> &DataContext {
        self.controller.recommender().data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_live_session_is_accessible() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        store.insert(id, SessionState::new()).await;

        let generation = store.with_session(id, SessionState::begin_query).await;
        assert_eq!(generation, Some(1));
        assert_eq!(store.evict_expired().await, 0);
    }

    #[tokio::test]
    async fn test_expired_session_removed_on_access() {
        let store = SessionStore::new(Duration::from_millis(20));
        let id = Uuid::new_v4();
        store.insert(id, SessionState::new()).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(store.with_session(id, |_| ()).await.is_none());
        assert!(store.remove(id).await.is_none());
    }

    #[tokio::test]
    async fn test_evict_expired_keeps_recent_sessions() {
        let store = SessionStore::new(Duration::from_millis(50));
        let stale = Uuid::new_v4();
        store.insert(stale, SessionState::new()).await;

        tokio::time::sleep(Duration::from_millis(100)).await;

        let fresh = Uuid::new_v4();
        store.insert(fresh, SessionState::new()).await;

        assert_eq!(store.evict_expired().await, 1);
        assert!(store.with_session(fresh, |_| ()).await.is_some());
        assert!(store.with_session(stale, |_| ()).await.is_none());
    }
}

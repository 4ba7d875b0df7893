use crate::domain::auth::Token;
use moka::future::Cache;
use serde_json::Value;
use std::time::Duration;

const MAX_SESSIONS: u64 = 10_000;

/// Everything a browser session carries between requests
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// CSRF state issued for the pending authorization round trip
    pub oauth_state: Option<String>,
    pub token: Option<Token>,
    /// Outcome of the last publish attempt, shown on the done page
    pub last_result: Option<Value>,
}

impl SessionData {
    pub fn is_connected(&self) -> bool {
        self.token.is_some()
    }
}

/// In-memory session storage. Entries expire after sitting idle for the TTL.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, SessionData>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(ttl)
                .build(),
        }
    }

    pub async fn load(&self, id: &str) -> Option<SessionData> {
        self.cache.get(id).await
    }

    pub async fn save(&self, id: &str, data: SessionData) {
        self.cache.insert(id.to_string(), data).await;
    }

    pub async fn remove(&self, id: &str) {
        self.cache.invalidate(id).await;
    }
}

/// Per-request handle on one session, injected by the session middleware
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
}

impl Session {
    pub fn new(id: String, store: SessionStore) -> Self {
        Self { id, store }
    }

    /// Snapshot of the session; empty when nothing has been saved yet
    pub async fn load(&self) -> SessionData {
        self.store.load(&self.id).await.unwrap_or_default()
    }

    /// Replace the stored session with `data`
    pub async fn save(&self, data: SessionData) {
        self.store.save(&self.id, data).await;
    }

    pub async fn clear(&self) {
        self.store.remove(&self.id).await;
    }
}

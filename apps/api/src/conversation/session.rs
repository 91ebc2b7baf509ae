//! Session store: one `ConversationMemory` per caller-supplied session id.
//!
//! Sessions are created on first record, refreshed on every exchange and evicted once
//! idle for longer than the configured TTL. The store lock is never held across an
//! `.await`: handlers read the history, call the model, then record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::conversation::memory::ConversationMemory;

#[derive(Debug)]
struct Session {
    memory: ConversationMemory,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A negative idle time (clock skew) never expires a session.
        (now - self.last_active)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    max_exchanges: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(max_exchanges: usize, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_exchanges,
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rendered transcript for `id`. Unknown or expired sessions render as empty.
    pub fn history(&self, id: &str) -> String {
        self.history_at(id, Utc::now())
    }

    fn history_at(&self, id: &str, now: DateTime<Utc>) -> String {
        let mut sessions = self.lock();
        if sessions
            .get(id)
            .is_some_and(|session| session.is_expired(now, self.ttl))
        {
            sessions.remove(id);
        }
        sessions
            .get(id)
            .map(|session| session.memory.render())
            .unwrap_or_default()
    }

    /// Records one exchange, creating the session (or replacing an expired one) if needed.
    pub fn record(&self, id: &str, user_text: &str, assistant_text: &str) {
        self.record_at(id, user_text, assistant_text, Utc::now());
    }

    fn record_at(&self, id: &str, user_text: &str, assistant_text: &str, now: DateTime<Utc>) {
        let mut sessions = self.lock();

        if sessions
            .get(id)
            .is_some_and(|session| session.is_expired(now, self.ttl))
        {
            sessions.remove(id);
        }

        let session = sessions.entry(id.to_string()).or_insert_with(|| {
            debug!("Creating conversation session {id}");
            Session {
                memory: ConversationMemory::new(self.max_exchanges),
                created_at: now,
                last_active: now,
            }
        });
        session.memory.record(user_text, assistant_text);
        session.last_active = now;
    }

    /// Number of exchanges currently held for `id`.
    pub fn exchanges(&self, id: &str) -> usize {
        self.lock()
            .get(id)
            .map(|session| session.memory.exchanges())
            .unwrap_or(0)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Number of live sessions, expired ones included until the next sweep.
    pub fn active_sessions(&self) -> usize {
        self.lock().len()
    }

    /// Drops every session idle for longer than the TTL. Returns how many were dropped.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = !session.is_expired(now, self.ttl);
            if !keep {
                debug!(
                    "Evicting session {id} (created {}, last active {})",
                    session.created_at, session.last_active
                );
            }
            keep
        });
        before - sessions.len()
    }

    /// Spawns the periodic eviction task. Intervals under a second are raised to one.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let every = every.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_expired(Utc::now());
                if evicted > 0 {
                    info!(
                        "Evicted {evicted} idle conversation session(s), {} remaining",
                        store.active_sessions()
                    );
                }
            }
        })
    }
}

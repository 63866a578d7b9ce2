//! Server-side session state behind a swappable store abstraction. The only
//! privilege tracked is the single admin flag; anonymous visitors simply
//! carry no session.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Cookie that carries the opaque session token.
pub const SESSION_COOKIE: &str = "catalog_session";

/// Sessions invalidate this long after creation; there is no sliding
/// renewal.
const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Backing mechanism for sessions. `get` treats expired records as absent,
/// `destroy` is idempotent.
pub trait SessionStore: Send + Sync {
    /// Issues a new privileged session.
    fn create(&self) -> Session;

    fn get(&self, token: &str) -> Option<Session>;

    fn destroy(&self, token: &str);
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            is_admin: true,
            created_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };

        let mut sessions = self.lock();
        // No background sweeper; dead records are dropped whenever the map
        // is touched.
        sessions.retain(|_, session| !session.is_expired());
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    fn get(&self, token: &str) -> Option<Session> {
        let mut sessions = self.lock();
        match sessions.get(token) {
            Some(session) if session.is_expired() => {
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    fn destroy(&self, token: &str) {
        self.lock().remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sessions_are_privileged_and_readable() {
        let store = MemorySessionStore::new();
        let session = store.create();
        assert!(session.is_admin);

        let fetched = store.get(&session.token).unwrap();
        assert!(fetched.is_admin);
        assert_eq!(fetched.token, session.token);
    }

    #[test]
    fn unknown_tokens_report_absent() {
        let store = MemorySessionStore::new();
        assert!(store.get("no-such-token").is_none());
    }

    #[test]
    fn destroy_is_idempotent() {
        let store = MemorySessionStore::new();
        let session = store.create();

        store.destroy(&session.token);
        assert!(store.get(&session.token).is_none());
        store.destroy(&session.token);
    }

    #[test]
    fn expired_sessions_are_absent_and_purged() {
        let store = MemorySessionStore::new();
        let session = store.create();

        store
            .lock()
            .get_mut(&session.token)
            .unwrap()
            .expires_at = Utc::now() - Duration::hours(1);

        assert!(store.get(&session.token).is_none());
        assert!(store.lock().is_empty());
    }

    #[test]
    fn create_sweeps_dead_records() {
        let store = MemorySessionStore::new();
        let stale = store.create();
        store
            .lock()
            .get_mut(&stale.token)
            .unwrap()
            .expires_at = Utc::now() - Duration::hours(1);

        let fresh = store.create();
        let sessions = store.lock();
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh.token));
    }

    #[test]
    fn ttl_is_a_fixed_day_from_creation() {
        let store = MemorySessionStore::new();
        let session = store.create();
        assert_eq!(
            session.expires_at - session.created_at,
            Duration::hours(24)
        );
        assert!(!session.is_expired());
    }
}

//! Server-owned editing sessions.
//!
//! A session lives until it is closed or sits idle past its TTL; clients
//! that navigate away never close theirs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use redator_core::DomainError;
use redator_core::services::EditorSession;

pub type SessionHandle = Arc<Mutex<EditorSession>>;

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct SessionEntry {
    handle: SessionHandle,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Open sessions by id. Each session is visible only to the user who
/// opened it.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Register a session, evicting any that have gone idle.
    pub async fn open(&self, session: EditorSession) -> SessionHandle {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle editor sessions");
        }

        sessions.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                expires_at: now + self.idle_ttl,
            },
        );
        tracing::debug!(session_id = %id, "Editor session opened");
        handle
    }

    /// The session `id`, if `user_id` owns it. Each access extends its
    /// lifetime.
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> Result<SessionHandle, DomainError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("editor session", id))?;

        if entry.is_expired(now) {
            sessions.remove(&id);
            tracing::debug!(session_id = %id, "Editor session expired");
            return Err(DomainError::not_found("editor session", id));
        }

        if snapshot(&entry.handle).owner() != user_id {
            return Err(DomainError::Authorization);
        }

        entry.expires_at = now + self.idle_ttl;
        Ok(entry.handle.clone())
    }

    /// Discard a session. Results of requests still in flight are dropped.
    pub async fn close(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.get(id, user_id).await?;
        self.sessions.write().await.remove(&id);
        tracing::debug!(session_id = %id, "Editor session closed");
        Ok(())
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of the session's current state.
pub fn snapshot(handle: &SessionHandle) -> EditorSession {
    handle
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

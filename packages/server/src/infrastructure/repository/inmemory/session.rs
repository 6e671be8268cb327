//! InMemory Session Repository 実装
//!
//! 接続ごとのセッションを HashMap で保持します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Session, SessionError, SessionRepository, SessionUpdate};

/// インメモリ Session Repository 実装
#[derive(Default)]
pub struct InMemorySessionRepository {
    /// connection id -> Session
    sessions: Arc<Mutex<HashMap<ConnectionId, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new(sessions: Arc<Mutex<HashMap<ConnectionId, Session>>>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: Session) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.connection_id.clone(), session);
    }

    async fn find(&self, connection_id: &ConnectionId) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(connection_id).cloned()
    }

    async fn update(
        &self,
        connection_id: &ConnectionId,
        apply: SessionUpdate,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let stored = sessions
            .get_mut(connection_id)
            .ok_or_else(|| SessionError::NotFound(connection_id.to_string()))?;

        // Apply to a copy so a failed transition leaves the stored session untouched
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    async fn delete(&self, connection_id: &ConnectionId) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(connection_id)
    }

    async fn count(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }
}

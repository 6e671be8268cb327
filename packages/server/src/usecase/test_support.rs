//! Test doubles shared by the use case tests.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pairchat_shared::time::{Clock, FixedClock};

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomRepository,
        ServerEvent, Session, SessionRepository,
    },
    infrastructure::repository::{InMemoryRoomRepository, InMemorySessionRepository},
    usecase::PairingLock,
};

/// MessagePusher that records every delivered event in order
#[derive(Default)]
pub struct RecordingPusher {
    registered: Mutex<HashSet<ConnectionId>>,
    delivered: Mutex<Vec<(ConnectionId, ServerEvent)>>,
}

impl RecordingPusher {
    /// Events delivered to `connection_id`, in delivery order
    pub async fn events_for(&self, connection_id: &ConnectionId) -> Vec<ServerEvent> {
        self.delivered
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == connection_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Every delivery so far
    pub async fn all(&self) -> Vec<(ConnectionId, ServerEvent)> {
        self.delivered.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.delivered.lock().await.clear();
    }

    pub async fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.registered.lock().await.contains(connection_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().await.insert(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.registered.lock().await.remove(connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        if !self.is_registered(connection_id).await {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        }
        self.delivered
            .lock()
            .await
            .push((connection_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        for target in targets {
            let _ = self.push_to(&target, event).await;
        }
        Ok(())
    }
}

/// Wired-up in-memory collaborators
pub struct Fixture {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub pusher: Arc<RecordingPusher>,
    pub clock: Arc<FixedClock>,
    pub pairing: PairingLock,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(InMemoryRoomRepository::default()),
            sessions: Arc::new(InMemorySessionRepository::default()),
            pusher: Arc::new(RecordingPusher::default()),
            clock: Arc::new(FixedClock::new(1_700_000_000_000)),
            pairing: PairingLock::default(),
        }
    }

    /// Register a connection with the pusher and give it a fresh session
    pub async fn connect(&self, id: &str) -> ConnectionId {
        let connection_id = ConnectionId::try_from(id).unwrap();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        self.pusher
            .register_client(connection_id.clone(), tx)
            .await;
        self.sessions.save(Session::new(connection_id.clone())).await;
        connection_id
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.rooms.clone()
    }

    pub fn session_repository(&self) -> Arc<dyn SessionRepository> {
        self.sessions.clone()
    }

    pub fn message_pusher(&self) -> Arc<dyn MessagePusher> {
        self.pusher.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn pairing_lock(&self) -> PairingLock {
        self.pairing.clone()
    }
}

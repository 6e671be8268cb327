//! Session coordinator: the single entry point the transport layer talks to.
//!
//! Each connection feeds its decoded events here in arrival order. Every
//! operation logs its own failures and never panics, so a misbehaving client
//! can only hurt itself.

use std::sync::Arc;

use pairchat_shared::time::Clock;

use crate::domain::{
    ClientEvent, ConnectionId, ConnectionIdFactory, MessagePusher, PusherChannel, Room,
    RoomRepository, Session, SessionRepository,
};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailError,
    GetRoomDetailUseCase, GetRoomsUseCase, JoinChatError, JoinChatUseCase, LeaveRoomUseCase,
    PairingLock, RelayMessageUseCase,
};

pub struct SessionCoordinator {
    sessions: Arc<dyn SessionRepository>,
    connect_participant: ConnectParticipantUseCase,
    disconnect_participant: DisconnectParticipantUseCase,
    join_chat: JoinChatUseCase,
    leave_room: LeaveRoomUseCase,
    relay_message: RelayMessageUseCase,
    get_rooms: GetRoomsUseCase,
    get_room_detail: GetRoomDetailUseCase,
}

impl SessionCoordinator {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let pairing = PairingLock::default();
        Self {
            connect_participant: ConnectParticipantUseCase::new(
                sessions.clone(),
                message_pusher.clone(),
            ),
            disconnect_participant: DisconnectParticipantUseCase::new(
                rooms.clone(),
                sessions.clone(),
                message_pusher.clone(),
                pairing.clone(),
            ),
            join_chat: JoinChatUseCase::new(
                rooms.clone(),
                sessions.clone(),
                message_pusher.clone(),
                clock,
                pairing.clone(),
            ),
            leave_room: LeaveRoomUseCase::new(
                rooms.clone(),
                sessions.clone(),
                message_pusher.clone(),
                pairing,
            ),
            relay_message: RelayMessageUseCase::new(rooms.clone(), sessions.clone(), message_pusher),
            get_rooms: GetRoomsUseCase::new(rooms.clone()),
            get_room_detail: GetRoomDetailUseCase::new(rooms),
            sessions,
        }
    }

    /// Accept a new connection and return its freshly assigned id.
    pub async fn connect(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionIdFactory::generate();
        self.connect_participant
            .execute(connection_id.clone(), sender)
            .await;
        tracing::info!("Connection '{}' accepted", connection_id);
        connection_id
    }

    /// Dispatch one inbound event from `connection_id`.
    pub async fn handle_event(&self, connection_id: &ConnectionId, event: ClientEvent) {
        let name = event.name();
        tracing::debug!("'{}' -> {}", connection_id, name);

        match event {
            ClientEvent::JoinChat { room, username } => {
                match self.join_chat.execute(connection_id, room, username).await {
                    Ok(_) => {}
                    Err(JoinChatError::RoomFull(room)) => {
                        tracing::info!("'{}' turned away from full room '{}'", connection_id, room);
                    }
                    Err(e) => {
                        tracing::warn!("Dropped {} from '{}': {}", name, connection_id, e);
                    }
                }
            }
            ClientEvent::SendMessage(message) => {
                if let Err(e) = self.relay_message.send(connection_id, message).await {
                    tracing::warn!("Dropped {} from '{}': {}", name, connection_id, e);
                }
            }
            ClientEvent::UpdateMessage { room, message } => {
                if let Err(e) = self
                    .relay_message
                    .update(connection_id, &room, message)
                    .await
                {
                    tracing::warn!("Dropped {} from '{}': {}", name, connection_id, e);
                }
            }
            ClientEvent::DeleteMessage { room, message_id } => {
                if let Err(e) = self
                    .relay_message
                    .delete(connection_id, &room, message_id)
                    .await
                {
                    tracing::warn!("Dropped {} from '{}': {}", name, connection_id, e);
                }
            }
            ClientEvent::LeaveRoom { room } => {
                if let Err(e) = self.leave_room.execute(connection_id, &room).await {
                    tracing::warn!("Dropped {} from '{}': {}", name, connection_id, e);
                }
            }
        }
    }

    /// Tear down a connection. Safe to call more than once.
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        let notified = self.disconnect_participant.execute(connection_id).await;
        tracing::info!(
            "Connection '{}' closed ({} peer(s) notified)",
            connection_id,
            notified.len()
        );
    }

    pub async fn session(&self, connection_id: &ConnectionId) -> Option<Session> {
        self.sessions.find(connection_id).await
    }

    pub async fn rooms(&self) -> Vec<Room> {
        self.get_rooms.execute().await
    }

    pub async fn room_detail(&self, room_key: String) -> Result<Room, GetRoomDetailError> {
        self.get_room_detail.execute(room_key).await
    }
}

//! UseCase: メッセージ中継処理（送信・編集・削除）
//!
//! サーバーはメッセージを保存せず、ペアになった相手へそのまま転送します。
//!
//! - send: 送信者以外（相手）にのみ転送。送信者は自分の画面に楽観的に追加済み
//! - update / delete: ルームの全員（送信者を含む）に転送
//!
//! 編集・削除の作成者チェックは行いません（クライアントを信頼する）。

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, MessageId, MessagePusher, Room, RoomKey, RoomRepository,
    ServerEvent, SessionError, SessionRepository,
};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            rooms,
            sessions,
            message_pusher,
        }
    }

    /// メッセージを相手に転送
    ///
    /// # Returns
    ///
    /// 転送先（相手）の接続 ID
    pub async fn send(
        &self,
        sender: &ConnectionId,
        message: ChatMessage,
    ) -> Result<ConnectionId, RelayError> {
        let room = self.paired_room(sender, &message.room).await?;
        let peer = room
            .peer_of(sender)
            .map(|o| o.connection_id.clone())
            .ok_or_else(|| RelayError::PeerMissing(room.key.to_string()))?;

        tracing::debug!(
            "Relaying message '{}' from '{}' to '{}' in room '{}'",
            message.id,
            sender,
            peer,
            room.key
        );
        let event = ServerEvent::ReceiveMessage(message);
        if let Err(e) = self.message_pusher.push_to(&peer, &event).await {
            tracing::warn!("Dropped message for '{}': {}", peer, e);
        }

        Ok(peer)
    }

    /// 編集済みメッセージをルーム全員に転送
    pub async fn update(
        &self,
        sender: &ConnectionId,
        room: &RoomKey,
        message: ChatMessage,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let room = self.paired_room(sender, room).await?;
        tracing::debug!(
            "Broadcasting update of message '{}' in room '{}'",
            message.id,
            room.key
        );
        self.broadcast(&room, ServerEvent::ReceiveUpdateMessage(message))
            .await
    }

    /// メッセージ削除をルーム全員に転送
    pub async fn delete(
        &self,
        sender: &ConnectionId,
        room: &RoomKey,
        message_id: MessageId,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let room = self.paired_room(sender, room).await?;
        tracing::debug!(
            "Broadcasting deletion of message '{}' in room '{}'",
            message_id,
            room.key
        );
        self.broadcast(&room, ServerEvent::ReceiveDeleteMessage(message_id))
            .await
    }

    /// 送信者が `room` でペアになっていることを確認し、レジストリ上のルームを返す
    async fn paired_room(&self, sender: &ConnectionId, room: &RoomKey) -> Result<Room, RelayError> {
        let session = self
            .sessions
            .find(sender)
            .await
            .ok_or_else(|| SessionError::NotFound(sender.to_string()))?;
        let room_key = session.ensure_paired_in(room)?;

        self.rooms
            .lookup(room_key)
            .await
            .ok_or_else(|| RelayError::PeerMissing(room_key.to_string()))
    }

    async fn broadcast(
        &self,
        room: &Room,
        event: ServerEvent,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let targets = room.connection_ids();
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &event)
            .await
        {
            tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
        }
        Ok(targets)
    }
}

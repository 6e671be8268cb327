//! UseCase: 明示的な退室処理
//!
//! 退室した接続は Connected に戻り、別のルームへ入室できます。
//! 残った相手には切断時と同様に user_left を通知します。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, RoomKey, RoomRepository, Session, SessionRepository,
};

use super::{PairingLock, error::LeaveRoomError, peer_left::notify_peer_left};

/// 退室のユースケース
pub struct LeaveRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    pairing: PairingLock,
}

impl LeaveRoomUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        pairing: PairingLock,
    ) -> Self {
        Self {
            rooms,
            sessions,
            message_pusher,
            pairing,
        }
    }

    /// 退室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(id))` - 退室し、残った相手 `id` に通知した
    /// * `Ok(None)` - 退室した（相手なし）、またはそのルームに入室していなかった
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: &RoomKey,
    ) -> Result<Option<ConnectionId>, LeaveRoomError> {
        let target = room.clone();
        let left = self
            .sessions
            .update(
                connection_id,
                Box::new(move |s: &mut Session| {
                    if s.room.as_ref() == Some(&target) {
                        s.leave().map(|_| ())
                    } else {
                        Ok(())
                    }
                }),
            )
            .await?;

        // The registry is authoritative: remove even if the session never saw the room
        let result = self.rooms.remove(room, connection_id).await;
        if result.removed.is_none() {
            tracing::debug!(
                "'{}' asked to leave room '{}' it does not occupy",
                connection_id,
                room
            );
            return Ok(None);
        }
        tracing::info!(
            "'{}' left room '{}' (now {:?})",
            connection_id,
            room,
            left.state
        );

        Ok(notify_peer_left(
            self.sessions.as_ref(),
            self.message_pusher.as_ref(),
            &self.pairing,
            &result,
        )
        .await)
    }
}

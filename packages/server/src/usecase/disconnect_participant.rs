//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 全ルームからの削除、残った相手への user_left 通知、セッションの破棄
//!
//! ### なぜこのテストが必要か
//! - 切断はどの状態からでも安全でなければならない（冪等）
//! - 両者が切断した後、ルームはレジストリから消えていなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の切断、相手待ち中の切断
//! - エッジケース：入室していない接続の切断、二重の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomRepository, SessionRepository};

use super::{PairingLock, peer_left::notify_peer_left};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    pairing: PairingLock,
}

impl DisconnectParticipantUseCase {
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

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// user_left を通知した接続 ID のリスト（通常は 0 件か 1 件）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        // 1. セッションを終端状態にして破棄（以降のイベントは処理されない）
        if let Some(mut session) = self.sessions.delete(connection_id).await {
            let room = session.disconnect();
            tracing::debug!(
                "Session '{}' disconnected (room: {:?})",
                connection_id,
                room.as_ref().map(|r| r.as_str())
            );
        }

        // 2. 全ルームから削除（通常は高々 1 ルーム）
        let results = self.rooms.remove_from_all(connection_id).await;

        // 3. 残った相手に通知
        let mut notified = Vec::new();
        for result in &results {
            if let Some(peer) = notify_peer_left(
                self.sessions.as_ref(),
                self.message_pusher.as_ref(),
                &self.pairing,
                result,
            )
            .await
            {
                notified.push(peer);
            }
        }

        // 4. 送信チャンネルの登録解除
        self.message_pusher.unregister_client(connection_id).await;

        notified
    }
}

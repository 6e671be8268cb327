//! UseCase: 接続受付処理
//!
//! トランスポートが受け付けた接続の送信チャンネルを登録し、
//! `Connected` 状態のセッションを作成します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, Session, SessionRepository};

/// 接続受付のユースケース
pub struct ConnectParticipantUseCase {
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(sessions: Arc<dyn SessionRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            sessions,
            message_pusher,
        }
    }

    /// 接続を登録する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - トランスポートが割り当てた接続 ID
    /// * `sender` - この接続へのメッセージ送信用チャンネル
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) -> Session {
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let session = Session::new(connection_id);
        self.sessions.save(session.clone()).await;
        session
    }
}

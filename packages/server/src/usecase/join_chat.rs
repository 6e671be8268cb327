//! UseCase: ルーム入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 入室制御（2 人上限）と、2 人目の入室時のペアリング通知
//!
//! ### なぜこのテストが必要か
//! - chat_started は両方の参加者に 1 回ずつ、相手のユーザー名で届かなければならない
//! - 満室時は拒否された接続にだけ room_full が届き、ルームは変化しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目・2 人目の入室
//! - 異常系：満室のルームへの入室、既に入室済みの接続からの再入室
//! - エッジケース：拒否後に別のルームへ再挑戦
//! - 競合：2 人目の admit 直後に先客が切断・退室した場合

use std::sync::Arc;

use pairchat_shared::time::Clock;

use crate::domain::{
    AdmitResult, ConnectionId, MessagePusher, Occupant, RejectReason, RoomKey, RoomRepository,
    SeatPosition, ServerEvent, Session, SessionRepository, Timestamp, Username,
};

use super::{PairingLock, error::JoinChatError};

/// ルーム入室のユースケース
pub struct JoinChatUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    pairing: PairingLock,
}

impl JoinChatUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        pairing: PairingLock,
    ) -> Self {
        Self {
            rooms,
            sessions,
            message_pusher,
            clock,
            pairing,
        }
    }

    /// 入室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(SeatPosition)` - 入室成功（First: 相手待ち、Second: ペアリング成立）
    /// * `Err(JoinChatError::RoomFull)` - 満室（room_full は送信済み）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: RoomKey,
        username: Username,
    ) -> Result<SeatPosition, JoinChatError> {
        // 1. Connected -> Joining
        {
            let room = room.clone();
            let username = username.clone();
            self.sessions
                .update(
                    connection_id,
                    Box::new(move |s: &mut Session| s.begin_join(room, username)),
                )
                .await?;
        }

        // 2. Registry に入室を依頼（在室数の確認と追加は不可分）
        let occupant = Occupant::new(
            connection_id.clone(),
            username.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let result = self.rooms.admit(room.clone(), occupant).await;

        match result {
            AdmitResult::Rejected { reason } => {
                self.sessions
                    .update(connection_id, Box::new(|s: &mut Session| s.reject_join()))
                    .await?;
                tracing::info!(
                    "'{}' ({}) was rejected from room '{}': {}",
                    username,
                    connection_id,
                    room,
                    reason.as_str()
                );

                match reason {
                    RejectReason::RoomFull => {
                        self.push(connection_id, &ServerEvent::room_full()).await;
                        Err(JoinChatError::RoomFull(room.into_string()))
                    }
                    RejectReason::AlreadyOccupant => {
                        Err(JoinChatError::AlreadyJoined(room.into_string()))
                    }
                }
            }
            AdmitResult::Admitted { position, .. } => {
                let _pairing = self.pairing.acquire().await;

                // 3. Joining -> Waiting | Paired
                if let Err(e) = self
                    .sessions
                    .update(
                        connection_id,
                        Box::new(move |s: &mut Session| s.complete_join(position)),
                    )
                    .await
                {
                    self.rooms.remove(&room, connection_id).await;
                    return Err(e.into());
                }
                tracing::info!(
                    "'{}' ({}) joined room '{}' as {:?} occupant",
                    username,
                    connection_id,
                    room,
                    position
                );

                self.push(connection_id, &ServerEvent::JoinedChat).await;

                if position == SeatPosition::Second {
                    self.start_chat(&room, connection_id).await;
                }

                Ok(position)
            }
        }
    }

    /// ペアリング成立: 先に入室した側を Paired にしてから、両者に相手の名前を通知する
    ///
    /// admit の後に相手が退室・切断していた場合は通知せず、入室者を Waiting に戻す
    async fn start_chat(&self, room: &RoomKey, joiner: &ConnectionId) {
        let occupants = self
            .rooms
            .lookup(room)
            .await
            .map(|r| r.occupants)
            .unwrap_or_default();
        let [first, second] = occupants.as_slice() else {
            self.abandon_pairing(room, joiner, "the other occupant is gone")
                .await;
            return;
        };
        if &second.connection_id != joiner {
            self.abandon_pairing(room, joiner, "the seats changed").await;
            return;
        }

        let paired_room = room.clone();
        if let Err(e) = self
            .sessions
            .update(
                &first.connection_id,
                Box::new(move |s: &mut Session| s.pair(&paired_room)),
            )
            .await
        {
            self.abandon_pairing(room, joiner, &e.to_string()).await;
            return;
        }

        self.push(
            &first.connection_id,
            &ServerEvent::ChatStarted {
                other_user: second.username.clone(),
            },
        )
        .await;
        self.push(
            &second.connection_id,
            &ServerEvent::ChatStarted {
                other_user: first.username.clone(),
            },
        )
        .await;
        tracing::info!(
            "Chat started in room '{}' between '{}' and '{}'",
            room,
            first.username,
            second.username
        );
    }

    /// Paired -> Waiting（相手には何も通知していない）
    async fn abandon_pairing(&self, room: &RoomKey, joiner: &ConnectionId, reason: &str) {
        tracing::info!(
            "Pairing of '{}' in room '{}' abandoned: {}",
            joiner,
            room,
            reason
        );
        let waiting_room = room.clone();
        if let Err(e) = self
            .sessions
            .update(
                joiner,
                Box::new(move |s: &mut Session| s.unpair(&waiting_room)),
            )
            .await
        {
            tracing::debug!("'{}' is no longer paired: {}", joiner, e);
        }
    }

    async fn push(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event).await {
            tracing::warn!("Failed to push '{}' to '{}': {}", event.name(), connection_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::{
        domain::{RemoveResult, Room, SessionState, ROOM_FULL_MESSAGE},
        infrastructure::repository::InMemoryRoomRepository,
        usecase::{DisconnectParticipantUseCase, LeaveRoomUseCase, test_support::Fixture},
    };

    fn usecase(fx: &Fixture) -> JoinChatUseCase {
        JoinChatUseCase::new(
            fx.room_repository(),
            fx.session_repository(),
            fx.message_pusher(),
            fx.clock(),
            fx.pairing_lock(),
        )
    }

    fn key(value: &str) -> RoomKey {
        RoomKey::try_from(value).unwrap()
    }

    fn name(value: &str) -> Username {
        Username::try_from(value).unwrap()
    }

    #[tokio::test]
    async fn test_first_join_waits() {
        // テスト項目: 1 人目の入室では joined_chat のみが届き、Waiting になる
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let usecase = usecase(&fx);

        // when (操作):
        let result = usecase.execute(&alice, key("R7"), name("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::First));
        assert_eq!(fx.pusher.events_for(&alice).await, vec![ServerEvent::JoinedChat]);
        let session = fx.sessions.find(&alice).await.unwrap();
        assert_eq!(session.state, SessionState::Waiting);
        assert_eq!(session.room, Some(key("R7")));
    }

    #[tokio::test]
    async fn test_second_join_notifies_both_with_other_username() {
        // テスト項目: 2 人目の入室で両者に chat_started が相手の名前付きで 1 回ずつ届く
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        let usecase = usecase(&fx);
        usecase.execute(&alice, key("R7"), name("alice")).await.unwrap();

        // when (操作):
        let result = usecase.execute(&bob, key("R7"), name("bob")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::Second));
        assert_eq!(
            fx.pusher.events_for(&alice).await,
            vec![
                ServerEvent::JoinedChat,
                ServerEvent::ChatStarted {
                    other_user: name("bob")
                },
            ]
        );
        assert_eq!(
            fx.pusher.events_for(&bob).await,
            vec![
                ServerEvent::JoinedChat,
                ServerEvent::ChatStarted {
                    other_user: name("alice")
                },
            ]
        );
        assert!(fx.sessions.find(&alice).await.unwrap().is_paired());
        assert!(fx.sessions.find(&bob).await.unwrap().is_paired());
    }

    #[tokio::test]
    async fn test_third_join_gets_room_full() {
        // テスト項目: 満室のルームへの入室は拒否され、room_full は拒否された接続にのみ届く
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        let carol = fx.connect("c").await;
        let usecase = usecase(&fx);
        usecase.execute(&alice, key("R7"), name("alice")).await.unwrap();
        usecase.execute(&bob, key("R7"), name("bob")).await.unwrap();
        fx.pusher.clear().await;

        // when (操作):
        let result = usecase.execute(&carol, key("R7"), name("carol")).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinChatError::RoomFull("R7".to_string())));
        assert_eq!(
            fx.pusher.all().await,
            vec![(
                carol.clone(),
                ServerEvent::RoomFull {
                    message: ROOM_FULL_MESSAGE.to_string()
                }
            )]
        );
        assert_eq!(fx.rooms.lookup(&key("R7")).await.unwrap().occupants.len(), 2);
        assert_eq!(
            fx.sessions.find(&carol).await.unwrap().state,
            SessionState::Connected
        );
    }

    #[tokio::test]
    async fn test_rejected_connection_can_retry_other_room() {
        // テスト項目: 拒否された接続は別のルームキーで再挑戦できる
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        let carol = fx.connect("c").await;
        let usecase = usecase(&fx);
        usecase.execute(&alice, key("R7"), name("alice")).await.unwrap();
        usecase.execute(&bob, key("R7"), name("bob")).await.unwrap();
        let _ = usecase.execute(&carol, key("R7"), name("carol")).await;

        // when (操作):
        let result = usecase.execute(&carol, key("R8"), name("carol")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::First));
        assert_eq!(fx.sessions.find(&carol).await.unwrap().room, Some(key("R8")));
    }

    #[tokio::test]
    async fn test_join_while_already_in_room_is_dropped() {
        // テスト項目: 入室済みの接続からの再入室要求は拒否され、何も送信されない
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let usecase = usecase(&fx);
        usecase.execute(&alice, key("R7"), name("alice")).await.unwrap();
        fx.pusher.clear().await;

        // when (操作):
        let result = usecase.execute(&alice, key("R8"), name("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinChatError::AlreadyJoined("R7".to_string())));
        assert!(fx.pusher.all().await.is_empty());
        assert!(fx.rooms.lookup(&key("R8")).await.is_none());
    }

    #[tokio::test]
    async fn test_join_records_clock_time() {
        // テスト項目: 入室時刻とルーム作成時刻に Clock の時刻が使われる
        let fx = Fixture::new();
        let alice = fx.connect("a").await;

        usecase(&fx)
            .execute(&alice, key("R7"), name("alice"))
            .await
            .unwrap();

        let room = fx.rooms.lookup(&key("R7")).await.unwrap();
        assert_eq!(room.created_at, Timestamp::new(1_700_000_000_000));
        assert_eq!(room.occupants[0].joined_at, Timestamp::new(1_700_000_000_000));
    }

    /// admit で 2 人目が入室した直後に、先客に起きる出来事
    #[derive(Clone, Copy)]
    enum Interruption {
        Disconnect,
        Leave,
        SessionLost,
    }

    /// admit の結果を返す前に Interruption を起こす RoomRepository
    struct InterruptedAdmit {
        inner: Arc<InMemoryRoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        pusher: Arc<dyn MessagePusher>,
        pairing: PairingLock,
        interruption: Interruption,
    }

    impl InterruptedAdmit {
        fn new(fx: &Fixture, interruption: Interruption) -> Self {
            Self {
                inner: fx.rooms.clone(),
                sessions: fx.session_repository(),
                pusher: fx.message_pusher(),
                pairing: fx.pairing_lock(),
                interruption,
            }
        }

        async fn interrupt(&self, room_key: &RoomKey, first: &ConnectionId) {
            match self.interruption {
                Interruption::Disconnect => {
                    DisconnectParticipantUseCase::new(
                        self.inner.clone(),
                        self.sessions.clone(),
                        self.pusher.clone(),
                        self.pairing.clone(),
                    )
                    .execute(first)
                    .await;
                }
                Interruption::Leave => {
                    LeaveRoomUseCase::new(
                        self.inner.clone(),
                        self.sessions.clone(),
                        self.pusher.clone(),
                        self.pairing.clone(),
                    )
                    .execute(first, room_key)
                    .await
                    .unwrap();
                }
                Interruption::SessionLost => {
                    self.sessions.delete(first).await;
                }
            }
        }
    }

    #[async_trait]
    impl RoomRepository for InterruptedAdmit {
        async fn admit(&self, room_key: RoomKey, occupant: Occupant) -> AdmitResult {
            let result = self.inner.admit(room_key.clone(), occupant).await;
            if let AdmitResult::Admitted {
                position: SeatPosition::Second,
                occupants,
            } = &result
            {
                self.interrupt(&room_key, &occupants[0].connection_id).await;
            }
            result
        }

        async fn remove(&self, room_key: &RoomKey, connection_id: &ConnectionId) -> RemoveResult {
            self.inner.remove(room_key, connection_id).await
        }

        async fn remove_from_all(&self, connection_id: &ConnectionId) -> Vec<RemoveResult> {
            self.inner.remove_from_all(connection_id).await
        }

        async fn lookup(&self, room_key: &RoomKey) -> Option<Room> {
            self.inner.lookup(room_key).await
        }

        async fn list_rooms(&self) -> Vec<Room> {
            self.inner.list_rooms().await
        }
    }

    fn interrupted_usecase(fx: &Fixture, interruption: Interruption) -> JoinChatUseCase {
        JoinChatUseCase::new(
            Arc::new(InterruptedAdmit::new(fx, interruption)),
            fx.session_repository(),
            fx.message_pusher(),
            fx.clock(),
            fx.pairing_lock(),
        )
    }

    #[tokio::test]
    async fn test_peer_disconnecting_right_after_admit_leaves_joiner_waiting() {
        // テスト項目: 2 人目の admit 直後に先客が切断すると、2 人目には chat_started も user_left も届かず Waiting になる
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        usecase(&fx).execute(&alice, key("R7"), name("alice")).await.unwrap();

        // when (操作):
        let result = interrupted_usecase(&fx, Interruption::Disconnect)
            .execute(&bob, key("R7"), name("bob"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::Second));
        assert_eq!(fx.pusher.events_for(&bob).await, vec![ServerEvent::JoinedChat]);
        assert_eq!(
            fx.sessions.find(&bob).await.unwrap().state,
            SessionState::Waiting
        );
        let room = fx.rooms.lookup(&key("R7")).await.unwrap();
        assert_eq!(room.occupants.len(), 1);
        assert_eq!(room.occupants[0].connection_id, bob);
        assert!(fx.sessions.find(&alice).await.is_none());
    }

    #[tokio::test]
    async fn test_joiner_left_waiting_pairs_with_next_arrival() {
        // テスト項目: ペアリングが不成立だった 2 人目は、次に入室した参加者とペアになる
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        let carol = fx.connect("c").await;
        usecase(&fx).execute(&alice, key("R7"), name("alice")).await.unwrap();
        interrupted_usecase(&fx, Interruption::Disconnect)
            .execute(&bob, key("R7"), name("bob"))
            .await
            .unwrap();
        fx.pusher.clear().await;

        // when (操作):
        let result = usecase(&fx).execute(&carol, key("R7"), name("carol")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::Second));
        assert_eq!(
            fx.pusher.events_for(&bob).await,
            vec![ServerEvent::ChatStarted {
                other_user: name("carol")
            }]
        );
        assert!(fx.sessions.find(&bob).await.unwrap().is_paired());
        assert!(fx.sessions.find(&carol).await.unwrap().is_paired());
    }

    #[tokio::test]
    async fn test_peer_leaving_right_after_admit_leaves_joiner_waiting() {
        // テスト項目: 2 人目の admit 直後に先客が leave_room すると、どちらにもペアリング通知は届かない
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        usecase(&fx).execute(&alice, key("R7"), name("alice")).await.unwrap();

        // when (操作):
        let result = interrupted_usecase(&fx, Interruption::Leave)
            .execute(&bob, key("R7"), name("bob"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::Second));
        assert_eq!(fx.pusher.events_for(&bob).await, vec![ServerEvent::JoinedChat]);
        assert_eq!(fx.pusher.events_for(&alice).await, vec![ServerEvent::JoinedChat]);
        assert_eq!(
            fx.sessions.find(&bob).await.unwrap().state,
            SessionState::Waiting
        );
        assert_eq!(
            fx.sessions.find(&alice).await.unwrap().state,
            SessionState::Connected
        );
    }

    #[tokio::test]
    async fn test_unpairable_first_occupant_stops_chat_start() {
        // テスト項目: 先客のセッションが消えていて Paired にできない場合、chat_started は送られない
        // given (前提条件):
        let fx = Fixture::new();
        let alice = fx.connect("a").await;
        let bob = fx.connect("b").await;
        usecase(&fx).execute(&alice, key("R7"), name("alice")).await.unwrap();
        fx.pusher.clear().await;

        // when (操作):
        let result = interrupted_usecase(&fx, Interruption::SessionLost)
            .execute(&bob, key("R7"), name("bob"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(SeatPosition::Second));
        assert_eq!(
            fx.pusher.all().await,
            vec![(bob.clone(), ServerEvent::JoinedChat)]
        );
        assert_eq!(
            fx.sessions.find(&bob).await.unwrap().state,
            SessionState::Waiting
        );
    }
}

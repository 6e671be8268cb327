//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    Session, SessionError,
    entity::{Occupant, Room, SeatPosition},
    value_object::{ConnectionId, RoomKey},
};

/// Outcome of an admission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitResult {
    /// The occupant took a seat. `occupants` is the full list after admission,
    /// in join order, so the caller can notify both sides of a new pairing.
    Admitted {
        position: SeatPosition,
        occupants: Vec<Occupant>,
    },
    /// The room was not changed
    Rejected { reason: RejectReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    RoomFull,
    AlreadyOccupant,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::RoomFull => "room full",
            RejectReason::AlreadyOccupant => "already in room",
        }
    }
}

/// Outcome of removing a connection from a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveResult {
    pub room: RoomKey,
    /// The removed record; `None` when the connection was not in the room
    pub removed: Option<Occupant>,
    /// The occupant still in the room, to be told its peer left
    pub remaining: Option<Occupant>,
    /// Whether the room was deleted because it became empty
    pub room_deleted: bool,
}

impl RemoveResult {
    pub fn noop(room: RoomKey) -> Self {
        Self {
            room,
            removed: None,
            remaining: None,
            room_deleted: false,
        }
    }
}

/// Room Registry
///
/// ルームの入室制御と在室管理のインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// 実装は同じルームキーに対する「在室数の確認と追加」を 1 つの不可分な操作として扱うこと。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 参加者の入室を試みる。ルームが存在しなければ作成する
    async fn admit(&self, room_key: RoomKey, occupant: Occupant) -> AdmitResult;

    /// 参加者を退室させる。空になったルームは削除する（冪等）
    async fn remove(&self, room_key: &RoomKey, connection_id: &ConnectionId) -> RemoveResult;

    /// 全てのルームから参加者を退室させる。実際に退室したルームの結果のみ返す
    async fn remove_from_all(&self, connection_id: &ConnectionId) -> Vec<RemoveResult>;

    /// ルームを取得
    async fn lookup(&self, room_key: &RoomKey) -> Option<Room>;

    /// 全てのルームをルームキー順で取得
    async fn list_rooms(&self) -> Vec<Room>;
}

/// Atomic in-place update applied to a stored session
pub type SessionUpdate = Box<dyn FnOnce(&mut Session) -> Result<(), SessionError> + Send>;

/// Session Repository
///
/// 接続ごとのセッション（状態・ルーム・ユーザー名）を保持するインターフェース。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを保存（上書き）
    async fn save(&self, session: Session);

    /// セッションを取得
    async fn find(&self, connection_id: &ConnectionId) -> Option<Session>;

    /// セッションを不可分に更新し、更新後のスナップショットを返す。
    /// 更新関数がエラーを返した場合、セッションは変更されない
    async fn update(
        &self,
        connection_id: &ConnectionId,
        apply: SessionUpdate,
    ) -> Result<Session, SessionError>;

    /// セッションを削除
    async fn delete(&self, connection_id: &ConnectionId) -> Option<Session>;

    /// セッション数を取得
    async fn count(&self) -> usize;
}

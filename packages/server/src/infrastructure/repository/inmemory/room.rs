//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 排他制御
//!
//! レジストリ全体を 1 つの Mutex で保護します。2 人用ルームのみを扱うため競合は少なく、
//! 「在室数の確認と追加」および「削除と空ルームの破棄」がルーム単位で不可分になります。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    AdmitResult, ConnectionId, Occupant, RejectReason, RemoveResult, Room, RoomError, RoomKey,
    RoomRepository,
};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// room key -> Room
    rooms: Arc<Mutex<HashMap<RoomKey, Room>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(rooms: Arc<Mutex<HashMap<RoomKey, Room>>>) -> Self {
        Self { rooms }
    }
}

/// Remove `connection_id` from the room stored under `room_key`, deleting it when empty.
fn remove_locked(
    rooms: &mut HashMap<RoomKey, Room>,
    room_key: &RoomKey,
    connection_id: &ConnectionId,
) -> RemoveResult {
    let Some(room) = rooms.get_mut(room_key) else {
        return RemoveResult::noop(room_key.clone());
    };
    let Some(removed) = room.remove_occupant(connection_id) else {
        return RemoveResult::noop(room_key.clone());
    };

    let remaining = room.occupants.first().cloned();
    let room_deleted = room.is_empty();
    if room_deleted {
        rooms.remove(room_key);
        tracing::debug!("Room '{}' is empty and was deleted", room_key);
    }

    RemoveResult {
        room: room_key.clone(),
        removed: Some(removed),
        remaining,
        room_deleted,
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn admit(&self, room_key: RoomKey, occupant: Occupant) -> AdmitResult {
        let mut rooms = self.rooms.lock().await;
        let created_at = occupant.joined_at;
        let room = rooms
            .entry(room_key.clone())
            .or_insert_with(|| Room::new(room_key.clone(), created_at));

        let result = match room.admit(occupant) {
            Ok(position) => AdmitResult::Admitted {
                position,
                occupants: room.occupants.clone(),
            },
            Err(RoomError::RoomFull { .. }) => AdmitResult::Rejected {
                reason: RejectReason::RoomFull,
            },
            Err(RoomError::AlreadyOccupant(_)) => AdmitResult::Rejected {
                reason: RejectReason::AlreadyOccupant,
            },
        };

        // A rejected first admission must not leave an empty room behind
        if room.is_empty() {
            rooms.remove(&room_key);
        }

        result
    }

    async fn remove(&self, room_key: &RoomKey, connection_id: &ConnectionId) -> RemoveResult {
        let mut rooms = self.rooms.lock().await;
        remove_locked(&mut rooms, room_key, connection_id)
    }

    async fn remove_from_all(&self, connection_id: &ConnectionId) -> Vec<RemoveResult> {
        let mut rooms = self.rooms.lock().await;
        let candidates: Vec<RoomKey> = rooms
            .iter()
            .filter(|(_, room)| room.contains(connection_id))
            .map(|(key, _)| key.clone())
            .collect();

        candidates
            .iter()
            .map(|key| remove_locked(&mut rooms, key, connection_id))
            .collect()
    }

    async fn lookup(&self, room_key: &RoomKey) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_key).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.key.cmp(&b.key));
        list
    }
}

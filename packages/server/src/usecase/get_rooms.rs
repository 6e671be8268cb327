//! UseCase: ルーム参照（診断用、読み取り専用）

use std::sync::Arc;

use crate::domain::{Room, RoomKey, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// ルームキー順のルーム一覧
    pub async fn execute(&self) -> Vec<Room> {
        self.rooms.list_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, room_key: String) -> Result<Room, GetRoomDetailError> {
        let room_key = RoomKey::new(room_key)?;
        self.rooms
            .lookup(&room_key)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}

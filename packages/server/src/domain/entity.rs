//! Domain entities: rooms, their occupants, and relayed chat messages.

use serde::Serialize;

use super::{
    error::RoomError,
    value_object::{ConnectionId, MessageBody, MessageId, RoomKey, Timestamp, Username},
};

/// Maximum number of occupants in a room
pub const ROOM_CAPACITY: usize = 2;

/// A connection's membership record in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub joined_at: Timestamp,
}

impl Occupant {
    pub fn new(connection_id: ConnectionId, username: Username, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            username,
            joined_at,
        }
    }
}

/// Seat taken by an admitted occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatPosition {
    First,
    Second,
}

/// A pairing slot holding 0..=2 occupants in join order.
///
/// An empty room never lives in the registry; it is deleted as soon as its
/// last occupant leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub key: RoomKey,
    pub occupants: Vec<Occupant>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(key: RoomKey, created_at: Timestamp) -> Self {
        Self {
            key,
            occupants: Vec::with_capacity(ROOM_CAPACITY),
            created_at,
        }
    }

    /// Append an occupant, returning the seat it took.
    pub fn admit(&mut self, occupant: Occupant) -> Result<SeatPosition, RoomError> {
        if self.contains(&occupant.connection_id) {
            return Err(RoomError::AlreadyOccupant(
                occupant.connection_id.into_string(),
            ));
        }
        if self.is_full() {
            return Err(RoomError::RoomFull {
                capacity: ROOM_CAPACITY,
            });
        }

        self.occupants.push(occupant);
        Ok(if self.occupants.len() == 1 {
            SeatPosition::First
        } else {
            SeatPosition::Second
        })
    }

    /// Remove the occupant with the given connection id, if present.
    pub fn remove_occupant(&mut self, connection_id: &ConnectionId) -> Option<Occupant> {
        let index = self
            .occupants
            .iter()
            .position(|o| &o.connection_id == connection_id)?;
        Some(self.occupants.remove(index))
    }

    /// The other occupant of the room
    pub fn peer_of(&self, connection_id: &ConnectionId) -> Option<&Occupant> {
        self.occupants
            .iter()
            .find(|o| &o.connection_id != connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.occupants
            .iter()
            .any(|o| &o.connection_id == connection_id)
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.occupants
            .iter()
            .map(|o| o.connection_id.clone())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.occupants.len() >= ROOM_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

pub type MessageExtensions = serde_json::Map<String, serde_json::Value>;

/// A chat message as relayed between the two occupants.
///
/// The server never stores these; it only validates and forwards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room: RoomKey,
    pub author: Username,
    pub body: MessageBody,
    /// Display time on the sender's clock (`H:MM`)
    pub time: String,
    pub edited: bool,
    /// Fields added by clients that the server relays untouched
    pub extra: MessageExtensions,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupant(id: &str, name: &str) -> Occupant {
        Occupant::new(
            ConnectionId::try_from(id).unwrap(),
            Username::try_from(name).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn empty_room() -> Room {
        Room::new(RoomKey::try_from("R7").unwrap(), Timestamp::new(1000))
    }

    #[test]
    fn test_admit_assigns_seats_in_join_order() {
        // テスト項目: 入室順に First, Second の席が割り当てられる
        // given (前提条件):
        let mut room = empty_room();

        // when (操作):
        let first = room.admit(occupant("c1", "alice"));
        let second = room.admit(occupant("c2", "bob"));

        // then (期待する結果):
        assert_eq!(first, Ok(SeatPosition::First));
        assert_eq!(second, Ok(SeatPosition::Second));
        assert_eq!(room.occupants[0].username.as_str(), "alice");
        assert_eq!(room.occupants[1].username.as_str(), "bob");
    }

    #[test]
    fn test_admit_rejects_third_occupant_without_mutation() {
        // テスト項目: 満室のルームへの 3 人目の入室は拒否され、状態は変化しない
        // given (前提条件):
        let mut room = empty_room();
        room.admit(occupant("c1", "alice")).unwrap();
        room.admit(occupant("c2", "bob")).unwrap();
        let before = room.clone();

        // when (操作):
        let result = room.admit(occupant("c3", "carol"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull { capacity: 2 }));
        assert_eq!(room, before);
    }

    #[test]
    fn test_admit_rejects_same_connection_twice() {
        // テスト項目: 同じ接続を二重に入室させることはできない
        // given (前提条件):
        let mut room = empty_room();
        room.admit(occupant("c1", "alice")).unwrap();

        // when (操作):
        let result = room.admit(occupant("c1", "alice"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::AlreadyOccupant("c1".to_string())));
        assert_eq!(room.occupants.len(), 1);
    }

    #[test]
    fn test_remove_occupant_returns_removed_record() {
        // テスト項目: 退室した参加者のレコードが返され、残りの参加者が先頭になる
        // given (前提条件):
        let mut room = empty_room();
        room.admit(occupant("c1", "alice")).unwrap();
        room.admit(occupant("c2", "bob")).unwrap();

        // when (操作):
        let removed = room.remove_occupant(&ConnectionId::try_from("c1").unwrap());

        // then (期待する結果):
        assert_eq!(removed.map(|o| o.username.into_string()), Some("alice".to_string()));
        assert_eq!(room.occupants.len(), 1);
        assert_eq!(room.occupants[0].username.as_str(), "bob");
    }

    #[test]
    fn test_remove_unknown_occupant_is_noop() {
        // テスト項目: 存在しない接続の削除は何もしない
        // given (前提条件):
        let mut room = empty_room();
        room.admit(occupant("c1", "alice")).unwrap();

        // when (操作):
        let removed = room.remove_occupant(&ConnectionId::try_from("ghost").unwrap());

        // then (期待する結果):
        assert!(removed.is_none());
        assert_eq!(room.occupants.len(), 1);
    }

    #[test]
    fn test_peer_of_returns_other_occupant() {
        // テスト項目: peer_of は自分以外の参加者を返す
        // given (前提条件):
        let mut room = empty_room();
        let alice = ConnectionId::try_from("c1").unwrap();
        room.admit(occupant("c1", "alice")).unwrap();

        // then (期待する結果): 1 人だけのときは相手がいない
        assert!(room.peer_of(&alice).is_none());

        // when (操作):
        room.admit(occupant("c2", "bob")).unwrap();

        // then (期待する結果):
        assert_eq!(room.peer_of(&alice).unwrap().username.as_str(), "bob");
    }
}

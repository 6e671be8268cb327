//! Domain layer for the pairing chat server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{ChatMessage, MessageExtensions, Occupant, ROOM_CAPACITY, Room, SeatPosition};
pub use error::{MessagePushError, RoomError, SessionError, ValueObjectError};
pub use event::{ClientEvent, ROOM_FULL_MESSAGE, ServerEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{
    AdmitResult, RejectReason, RemoveResult, RoomRepository, SessionRepository, SessionUpdate,
};
pub use session::{Session, SessionState};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, MessageBody, MessageId, RoomKey, Timestamp, Username,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;

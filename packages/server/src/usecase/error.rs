//! UseCase error types.

use thiserror::Error;

use crate::domain::{SessionError, ValueObjectError};

/// Errors from `join_chat`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinChatError {
    /// The room already has two occupants; the client may try another key
    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error("connection already joined room '{0}'")]
    AlreadyJoined(String),

    #[error(transparent)]
    Session(SessionError),
}

impl From<SessionError> for JoinChatError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::AlreadyJoined(room) => JoinChatError::AlreadyJoined(room),
            other => JoinChatError::Session(other),
        }
    }
}

/// Errors from message relay (send / update / delete)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The registry no longer holds the room or the peer
    #[error("no peer in room '{0}'")]
    PeerMissing(String),
}

/// Errors from `leave_room`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors from the room detail lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,

    #[error("invalid room key: {0}")]
    InvalidRoomKey(#[from] ValueObjectError),
}

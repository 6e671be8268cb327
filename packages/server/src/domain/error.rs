//! Domain error types.

use thiserror::Error;

use super::session::SessionState;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room key must not be empty")]
    EmptyRoomKey,

    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("message id must not be empty")]
    EmptyMessageId,

    #[error("message body must not be empty")]
    EmptyMessageBody,
}

/// Errors raised by the `Room` entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The room already holds its maximum number of occupants
    #[error("room is full (capacity: {capacity})")]
    RoomFull { capacity: usize },

    /// The connection already occupies this room
    #[error("connection '{0}' already occupies the room")]
    AlreadyOccupant(String),
}

/// Errors raised by `Session` state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session for connection '{0}' not found")]
    NotFound(String),

    #[error("connection already joined room '{0}'")]
    AlreadyJoined(String),

    #[error("connection is not paired")]
    NotPaired,

    #[error("event addressed to room '{actual}' but connection is in room '{expected}'")]
    RoomMismatch { expected: String, actual: String },

    #[error("cannot {action} while in state {from:?}")]
    IllegalTransition {
        from: SessionState,
        action: &'static str,
    },
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}

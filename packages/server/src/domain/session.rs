//! Per-connection session record and its state machine.
//!
//! ```text
//! Connected --join--> Joining --admitted(first)--> Waiting --peer joined--> Paired
//!     ^                  |    --admitted(second)-----------------------------^  |
//!     |               rejected                      Waiting <--peer left--------+
//!     +------------------+----------- leave (Waiting | Paired) -----------------+
//! any state --disconnect--> Disconnected
//! ```

use serde::Serialize;

use super::{
    entity::SeatPosition,
    error::SessionError,
    value_object::{ConnectionId, RoomKey, Username},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Connected,
    Joining,
    Waiting,
    Paired,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub state: SessionState,
    pub room: Option<RoomKey>,
    pub username: Option<Username>,
}

impl Session {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            state: SessionState::Connected,
            room: None,
            username: None,
        }
    }

    /// `Connected -> Joining`
    pub fn begin_join(&mut self, room: RoomKey, username: Username) -> Result<(), SessionError> {
        match self.state {
            SessionState::Connected => {
                self.state = SessionState::Joining;
                self.room = Some(room);
                self.username = Some(username);
                Ok(())
            }
            SessionState::Waiting | SessionState::Paired => Err(SessionError::AlreadyJoined(
                self.room_name().unwrap_or_default(),
            )),
            from => Err(SessionError::IllegalTransition {
                from,
                action: "join",
            }),
        }
    }

    /// `Joining -> Waiting | Paired`
    pub fn complete_join(&mut self, position: SeatPosition) -> Result<(), SessionError> {
        self.expect_state(SessionState::Joining, "complete join")?;
        self.state = match position {
            SeatPosition::First => SessionState::Waiting,
            SeatPosition::Second => SessionState::Paired,
        };
        Ok(())
    }

    /// `Joining -> Connected`
    pub fn reject_join(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Joining, "reject join")?;
        self.state = SessionState::Connected;
        self.room = None;
        Ok(())
    }

    /// `Waiting -> Paired`, only for the room the session is waiting in
    pub fn pair(&mut self, room: &RoomKey) -> Result<(), SessionError> {
        self.expect_state(SessionState::Waiting, "pair")?;
        self.ensure_room(room)?;
        self.state = SessionState::Paired;
        Ok(())
    }

    /// `Paired -> Waiting`, after the peer left the room
    pub fn unpair(&mut self, room: &RoomKey) -> Result<(), SessionError> {
        self.expect_state(SessionState::Paired, "unpair")?;
        self.ensure_room(room)?;
        self.state = SessionState::Waiting;
        Ok(())
    }

    /// `Waiting | Paired -> Connected`, returning the room that was left
    pub fn leave(&mut self) -> Result<RoomKey, SessionError> {
        match self.state {
            SessionState::Waiting | SessionState::Paired => {
                self.state = SessionState::Connected;
                self.room.take().ok_or(SessionError::NotPaired)
            }
            from => Err(SessionError::IllegalTransition {
                from,
                action: "leave",
            }),
        }
    }

    /// Any state `-> Disconnected`. Terminal.
    pub fn disconnect(&mut self) -> Option<RoomKey> {
        self.state = SessionState::Disconnected;
        self.room.take()
    }

    /// Check the session may relay a message addressed to `room`.
    pub fn ensure_paired_in(&self, room: &RoomKey) -> Result<&RoomKey, SessionError> {
        if self.state != SessionState::Paired {
            return Err(SessionError::NotPaired);
        }
        self.ensure_room(room)
    }

    pub fn is_paired(&self) -> bool {
        self.state == SessionState::Paired
    }

    fn ensure_room(&self, room: &RoomKey) -> Result<&RoomKey, SessionError> {
        match &self.room {
            Some(current) if current == room => Ok(current),
            Some(current) => Err(SessionError::RoomMismatch {
                expected: current.to_string(),
                actual: room.to_string(),
            }),
            None => Err(SessionError::NotPaired),
        }
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::IllegalTransition {
                from: self.state,
                action,
            })
        }
    }

    fn room_name(&self) -> Option<String> {
        self.room.as_ref().map(|r| r.to_string())
    }
}

//! UseCase layer: one use case per protocol operation, plus the
//! `SessionCoordinator` facade that dispatches client events to them.

pub mod connect_participant;
pub mod coordinator;
pub mod disconnect_participant;
pub mod error;
pub mod get_rooms;
pub mod join_chat;
pub mod leave_room;
mod pairing;
mod peer_left;
pub mod relay_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use coordinator::SessionCoordinator;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetRoomDetailError, JoinChatError, LeaveRoomError, RelayError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_chat::JoinChatUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use pairing::PairingLock;
pub use relay_message::RelayMessageUseCase;

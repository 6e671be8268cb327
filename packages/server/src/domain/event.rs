//! Events exchanged between connections and the session coordinator.

use super::{
    entity::ChatMessage,
    value_object::{MessageId, RoomKey, Username},
};

/// Text sent with `room_full`
pub const ROOM_FULL_MESSAGE: &str = "Room is full. Try another room.";

/// Validated inbound event from a client connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JoinChat { room: RoomKey, username: Username },
    SendMessage(ChatMessage),
    DeleteMessage { room: RoomKey, message_id: MessageId },
    UpdateMessage { room: RoomKey, message: ChatMessage },
    LeaveRoom { room: RoomKey },
}

impl ClientEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinChat { .. } => "join_chat",
            ClientEvent::SendMessage(_) => "send_message",
            ClientEvent::DeleteMessage { .. } => "delete_message",
            ClientEvent::UpdateMessage { .. } => "update_message",
            ClientEvent::LeaveRoom { .. } => "leave_room",
        }
    }
}

/// Outbound event addressed to one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    JoinedChat,
    RoomFull { message: String },
    ChatStarted { other_user: Username },
    ReceiveMessage(ChatMessage),
    ReceiveDeleteMessage(MessageId),
    ReceiveUpdateMessage(ChatMessage),
    UserLeft { other_user: Username },
}

impl ServerEvent {
    pub fn room_full() -> Self {
        ServerEvent::RoomFull {
            message: ROOM_FULL_MESSAGE.to_string(),
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::JoinedChat => "joined_chat",
            ServerEvent::RoomFull { .. } => "room_full",
            ServerEvent::ChatStarted { .. } => "chat_started",
            ServerEvent::ReceiveMessage(_) => "receive_message",
            ServerEvent::ReceiveDeleteMessage(_) => "receive_delete_message",
            ServerEvent::ReceiveUpdateMessage(_) => "receive_update_message",
            ServerEvent::UserLeft { .. } => "user_left",
        }
    }
}

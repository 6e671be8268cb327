//! WebSocket event envelopes.
//!
//! Every frame is `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat message object as it travels on the wire
///
/// Fields the server does not know about are kept in `extra` and written back
/// unchanged. A missing `edited` reads as `false` and a `false` one is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub room: String,
    pub author: String,
    pub message: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub edited: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinChatPayload {
    pub room: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessagePayload {
    pub room: String,
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessagePayload {
    pub room: String,
    pub updated_message: MessageDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoomPayload {
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFullPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherUserPayload {
    pub other_user: String,
}

/// Client -> Server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    JoinChat(JoinChatPayload),
    SendMessage(MessageDto),
    DeleteMessage(DeleteMessagePayload),
    UpdateMessage(UpdateMessagePayload),
    LeaveRoom(LeaveRoomPayload),
}

/// Server -> Client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    JoinedChat,
    RoomFull(RoomFullPayload),
    ChatStarted(OtherUserPayload),
    ReceiveMessage(MessageDto),
    ReceiveDeleteMessage(String),
    ReceiveUpdateMessage(MessageDto),
    UserLeft(OtherUserPayload),
}

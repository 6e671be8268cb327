//! Conversion logic between DTOs and domain types.
//!
//! Inbound conversions validate (non-empty keys, names, ids and bodies);
//! outbound conversions are infallible.

use pairchat_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, ClientEvent, MessageBody, MessageId, Occupant, Room, RoomKey, ServerEvent,
    Username, ValueObjectError,
};
use crate::infrastructure::dto::{
    http::{OccupantDetailDto, RoomDetailDto, RoomSummaryDto},
    websocket::{
        InboundEvent, MessageDto, OtherUserPayload, OutboundEvent, RoomFullPayload,
    },
};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<MessageDto> for ChatMessage {
    type Error = ValueObjectError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(dto.id)?,
            room: RoomKey::new(dto.room)?,
            author: Username::new(dto.author)?,
            body: MessageBody::new(dto.message)?,
            time: dto.time,
            edited: dto.edited,
            extra: dto.extra,
        })
    }
}

impl TryFrom<InboundEvent> for ClientEvent {
    type Error = ValueObjectError;

    fn try_from(dto: InboundEvent) -> Result<Self, Self::Error> {
        Ok(match dto {
            InboundEvent::JoinChat(p) => ClientEvent::JoinChat {
                room: RoomKey::new(p.room)?,
                username: Username::new(p.username)?,
            },
            InboundEvent::SendMessage(message) => ClientEvent::SendMessage(message.try_into()?),
            InboundEvent::DeleteMessage(p) => ClientEvent::DeleteMessage {
                room: RoomKey::new(p.room)?,
                message_id: MessageId::new(p.message_id)?,
            },
            InboundEvent::UpdateMessage(p) => ClientEvent::UpdateMessage {
                room: RoomKey::new(p.room)?,
                message: p.updated_message.try_into()?,
            },
            InboundEvent::LeaveRoom(p) => ClientEvent::LeaveRoom {
                room: RoomKey::new(p.room)?,
            },
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for MessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.into_string(),
            room: model.room.into_string(),
            author: model.author.into_string(),
            message: model.body.into_string(),
            time: model.time,
            edited: model.edited,
            extra: model.extra,
        }
    }
}

impl From<ServerEvent> for OutboundEvent {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::JoinedChat => OutboundEvent::JoinedChat,
            ServerEvent::RoomFull { message } => OutboundEvent::RoomFull(RoomFullPayload { message }),
            ServerEvent::ChatStarted { other_user } => OutboundEvent::ChatStarted(OtherUserPayload {
                other_user: other_user.into_string(),
            }),
            ServerEvent::ReceiveMessage(message) => OutboundEvent::ReceiveMessage(message.into()),
            ServerEvent::ReceiveDeleteMessage(id) => OutboundEvent::ReceiveDeleteMessage(id.into_string()),
            ServerEvent::ReceiveUpdateMessage(message) => {
                OutboundEvent::ReceiveUpdateMessage(message.into())
            }
            ServerEvent::UserLeft { other_user } => OutboundEvent::UserLeft(OtherUserPayload {
                other_user: other_user.into_string(),
            }),
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            room: room.key.as_str().to_string(),
            occupants: room
                .occupants
                .iter()
                .map(|o| o.username.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Occupant> for OccupantDetailDto {
    fn from(occupant: &Occupant) -> Self {
        Self {
            connection_id: occupant.connection_id.as_str().to_string(),
            username: occupant.username.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(occupant.joined_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            room: room.key.as_str().to_string(),
            occupants: room.occupants.iter().map(OccupantDetailDto::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, Timestamp},
        infrastructure::dto::websocket::{DeleteMessagePayload, JoinChatPayload},
    };

    fn message_dto(body: &str) -> MessageDto {
        MessageDto {
            id: "c1-1700000000000".to_string(),
            room: "R7".to_string(),
            author: "alice".to_string(),
            message: body.to_string(),
            time: "9:05".to_string(),
            edited: false,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_join_chat_to_domain() {
        // テスト項目: join_chat DTO がドメインイベントに変換される
        // given (前提条件):
        let dto = InboundEvent::JoinChat(JoinChatPayload {
            room: "R7".to_string(),
            username: "alice".to_string(),
        });

        // when (操作):
        let event = ClientEvent::try_from(dto).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::JoinChat {
                room: RoomKey::try_from("R7").unwrap(),
                username: Username::try_from("alice").unwrap(),
            }
        );
    }

    #[test]
    fn test_join_chat_with_empty_username_is_rejected() {
        // テスト項目: 空のユーザー名での join_chat は変換エラーになる
        let dto = InboundEvent::JoinChat(JoinChatPayload {
            room: "R7".to_string(),
            username: String::new(),
        });

        assert_eq!(
            ClientEvent::try_from(dto),
            Err(ValueObjectError::EmptyUsername)
        );
    }

    #[test]
    fn test_empty_message_body_is_rejected() {
        // テスト項目: 本文が空のメッセージは変換エラーになる
        let dto = InboundEvent::SendMessage(message_dto(""));

        assert_eq!(
            ClientEvent::try_from(dto),
            Err(ValueObjectError::EmptyMessageBody)
        );
    }

    #[test]
    fn test_delete_message_to_domain() {
        // テスト項目: delete_message DTO がドメインイベントに変換される
        let dto = InboundEvent::DeleteMessage(DeleteMessagePayload {
            room: "R7".to_string(),
            message_id: "m1".to_string(),
        });

        let event = ClientEvent::try_from(dto).unwrap();

        assert_eq!(event.name(), "delete_message");
    }

    #[test]
    fn test_message_survives_domain_round_trip() {
        // テスト項目: メッセージはドメインを経由しても内容が変わらない（中継はそのまま転送）
        let dto = message_dto("hi");

        let domain = ChatMessage::try_from(dto.clone()).unwrap();
        let back = MessageDto::from(domain);

        assert_eq!(back, dto);
    }

    #[test]
    fn test_message_extra_fields_survive_domain_round_trip() {
        // テスト項目: クライアント独自のフィールドもドメインを経由して転送される
        let mut dto = message_dto("hi");
        dto.extra
            .insert("replyTo".to_string(), serde_json::json!("m0"));

        let domain = ChatMessage::try_from(dto.clone()).unwrap();
        assert_eq!(domain.extra.get("replyTo"), Some(&serde_json::json!("m0")));

        assert_eq!(MessageDto::from(domain), dto);
    }

    #[test]
    fn test_server_event_to_dto() {
        // テスト項目: ServerEvent が対応する OutboundEvent に変換される
        let event = ServerEvent::UserLeft {
            other_user: Username::try_from("bob").unwrap(),
        };

        let dto = OutboundEvent::from(event);

        assert_eq!(
            dto,
            OutboundEvent::UserLeft(OtherUserPayload {
                other_user: "bob".to_string()
            })
        );
        assert_eq!(
            OutboundEvent::from(ServerEvent::room_full()),
            OutboundEvent::RoomFull(RoomFullPayload {
                message: "Room is full. Try another room.".to_string()
            })
        );
    }

    #[test]
    fn test_room_to_http_dtos() {
        // テスト項目: Room がサマリー・詳細 DTO に変換される
        let mut room = Room::new(RoomKey::try_from("R7").unwrap(), Timestamp::new(0));
        room.admit(Occupant::new(
            ConnectionId::try_from("c1").unwrap(),
            Username::try_from("alice").unwrap(),
            Timestamp::new(1672531200000),
        ))
        .unwrap();

        let summary = RoomSummaryDto::from(&room);
        let detail = RoomDetailDto::from(&room);

        assert_eq!(summary.occupants, vec!["alice".to_string()]);
        assert!(summary.created_at.starts_with("1970-01-01T00:00:00"));
        assert_eq!(detail.occupants[0].connection_id, "c1");
        assert!(detail.occupants[0].joined_at.starts_with("2023-01-01T00:00:00"));
    }
}

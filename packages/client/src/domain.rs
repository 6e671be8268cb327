//! Domain logic for client-side operations.
//!
//! Pure functions over `ChatView`: applying server events, turning commands
//! into outbound events, and the reconnect policy. No I/O happens here.

use pairchat_server::infrastructure::dto::websocket::{
    DeleteMessagePayload, InboundEvent, JoinChatPayload, LeaveRoomPayload, MessageDto,
    OutboundEvent, UpdateMessagePayload,
};

use crate::{command::Command, error::ClientError, formatter::MessageFormatter, view::ChatView};

/// What a command produced: an event to send and/or text to show
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub event: Option<InboundEvent>,
    pub output: Option<String>,
}

impl CommandOutcome {
    fn send(event: InboundEvent) -> Self {
        Self {
            event: Some(event),
            output: None,
        }
    }

    fn show(output: String) -> Self {
        Self {
            event: None,
            output: Some(output),
        }
    }
}

/// Stamp for a message about to be sent
#[derive(Debug, Clone)]
pub struct MessageStamp {
    /// Session token followed by the millisecond timestamp
    pub id: String,
    /// `H:MM` on the local clock
    pub time: String,
}

/// Apply one server event to the view and return the text to print.
pub fn apply_event(view: &mut ChatView, event: OutboundEvent) -> String {
    match event {
        OutboundEvent::JoinedChat => {
            MessageFormatter::format_joined(view.room().unwrap_or_default())
        }
        OutboundEvent::RoomFull(payload) => {
            view.reject_room();
            MessageFormatter::format_room_full(&payload.message)
        }
        OutboundEvent::ChatStarted(payload) => {
            let output = MessageFormatter::format_chat_started(&payload.other_user);
            view.start_chat(payload.other_user);
            output
        }
        OutboundEvent::ReceiveMessage(message) => {
            let output = format!("\n{}\n", MessageFormatter::format_message(&message, None));
            view.add(message);
            output
        }
        OutboundEvent::ReceiveUpdateMessage(message) => {
            let own = view.is_own(&message);
            let output = format!(
                "\n~ {}\n",
                MessageFormatter::format_message(&message, None)
            );
            // My own edits come back too; they are already applied
            if view.apply_update(message) && !own {
                output
            } else {
                String::new()
            }
        }
        OutboundEvent::ReceiveDeleteMessage(id) => {
            if view.apply_delete(&id) {
                "\n- A message was deleted.\n".to_string()
            } else {
                String::new()
            }
        }
        OutboundEvent::UserLeft(payload) => {
            view.peer_left();
            MessageFormatter::format_user_left(&payload.other_user)
        }
    }
}

/// Run a command against the view.
///
/// `Quit` is handled by the session loop and yields an empty outcome here.
pub fn execute_command(view: &mut ChatView, command: Command, stamp: MessageStamp) -> CommandOutcome {
    match command {
        Command::Join(room) => {
            if let Some(current) = view.room() {
                return CommandOutcome::show(format!(
                    "\nAlready in room '{}'. /leave first.\n",
                    current
                ));
            }
            view.request_room(room.clone());
            CommandOutcome::send(InboundEvent::JoinChat(JoinChatPayload {
                room,
                username: view.username().to_string(),
            }))
        }
        Command::Say(text) => {
            if text.is_empty() {
                return CommandOutcome::default();
            }
            let Some(room) = paired_room(view) else {
                return CommandOutcome::show(not_paired(view));
            };
            let message = MessageDto {
                id: stamp.id,
                room,
                author: view.username().to_string(),
                message: text,
                time: stamp.time,
                edited: false,
                extra: Default::default(),
            };
            view.add(message.clone());
            CommandOutcome::send(InboundEvent::SendMessage(message))
        }
        Command::Edit { index, text } => {
            let Some(room) = paired_room(view) else {
                return CommandOutcome::show(not_paired(view));
            };
            let Some(original) = view.own_message(index) else {
                return CommandOutcome::show(no_such_message(index));
            };
            let updated = MessageDto {
                message: text,
                edited: true,
                ..original.clone()
            };
            view.apply_update(updated.clone());
            CommandOutcome::send(InboundEvent::UpdateMessage(UpdateMessagePayload {
                room,
                updated_message: updated,
            }))
        }
        Command::Delete(index) => {
            let Some(room) = paired_room(view) else {
                return CommandOutcome::show(not_paired(view));
            };
            let Some(message_id) = view.own_message(index).map(|m| m.id.clone()) else {
                return CommandOutcome::show(no_such_message(index));
            };
            view.apply_delete(&message_id);
            CommandOutcome::send(InboundEvent::DeleteMessage(DeleteMessagePayload {
                room,
                message_id,
            }))
        }
        Command::List => CommandOutcome::show(MessageFormatter::format_view(view)),
        Command::History => CommandOutcome::show(MessageFormatter::format_history(view.history())),
        Command::Leave => match view.leave() {
            Some(room) => CommandOutcome {
                output: Some(format!("\n* Left room '{}'.\n", room)),
                event: Some(InboundEvent::LeaveRoom(LeaveRoomPayload { room })),
            },
            None => CommandOutcome::show("\nNot in a room.\n".to_string()),
        },
        Command::Help => CommandOutcome::show(MessageFormatter::format_help()),
        Command::Quit => CommandOutcome::default(),
    }
}

fn paired_room(view: &ChatView) -> Option<String> {
    view.peer()?;
    view.room().map(str::to_string)
}

fn not_paired(view: &ChatView) -> String {
    match view.room() {
        Some(room) => format!("\nNobody else is in '{}' yet.\n", room),
        None => "\nJoin a room first: /join <room>\n".to_string(),
    }
}

fn no_such_message(index: usize) -> String {
    format!("\nYou have no message #{} (see /list).\n", index)
}

/// Errors that mean the server went away rather than a local failure.
pub fn is_connection_error(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::ConnectionError(_) | ClientError::ConnectionLost
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    is_connection_error(error) && current_attempt < max_attempts
}

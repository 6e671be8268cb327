//! Message formatting utilities for client display.

use pairchat_server::infrastructure::dto::websocket::MessageDto;

use crate::view::{ChatView, HistoryEntry};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn format_welcome(username: &str) -> String {
        format!(
            "\nYou are '{}'. /join <room> to start, /help for commands.\n",
            username
        )
    }

    pub fn format_joined(room: &str) -> String {
        format!("\n* Joined room '{}'. Waiting for someone to join...\n", room)
    }

    pub fn format_room_full(message: &str) -> String {
        format!("\n! {}\n", message)
    }

    pub fn format_chat_started(other_user: &str) -> String {
        format!("\n* Chatting with {}\n", other_user)
    }

    pub fn format_user_left(other_user: &str) -> String {
        format!("\n- {} has left the chat.\n", other_user)
    }

    /// Format one chat line
    ///
    /// # Arguments
    ///
    /// * `message` - The message to render
    /// * `own_index` - `Some(n)` when it is my n-th message (shown as `#n`)
    pub fn format_message(message: &MessageDto, own_index: Option<usize>) -> String {
        let marker = match own_index {
            Some(n) => format!("#{} ", n),
            None => String::new(),
        };
        let edited = if message.edited { " (edited)" } else { "" };
        format!(
            "{}[{}] @{}: {}{}",
            marker, message.time, message.author, message.message, edited
        )
    }

    /// Render the whole local conversation
    pub fn format_view(view: &ChatView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        match (view.room(), view.peer()) {
            (Some(room), Some(peer)) => {
                output.push_str(&format!("Room '{}' with {}\n", room, peer))
            }
            (Some(room), None) => output.push_str(&format!("Room '{}' (waiting)\n", room)),
            (None, _) => output.push_str("(not in a room)\n"),
        }
        output.push_str(&format!("{}\n", RULE));

        if view.messages().is_empty() {
            output.push_str("(No messages)\n");
        } else {
            let mut own = 0;
            for message in view.messages() {
                let own_index = if view.is_own(message) {
                    own += 1;
                    Some(own)
                } else {
                    None
                };
                output.push_str(&Self::format_message(message, own_index));
                output.push('\n');
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_history(entries: &[HistoryEntry]) -> String {
        if entries.is_empty() {
            return "\n(No chat history)\n".to_string();
        }
        let mut output = String::from("\nChat history:\n");
        for entry in entries {
            output.push_str(&format!("  {} in '{}'\n", entry.username, entry.room));
        }
        output
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  /join <room>       join a room",
            "  /edit <n> <text>   edit your n-th message",
            "  /delete <n>        delete your n-th message",
            "  /list              show the conversation",
            "  /history           show users you have chatted with",
            "  /leave             leave the current room",
            "  /quit              exit",
            "  //text             send a message starting with '/'",
            "",
        ]
        .join("\n")
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

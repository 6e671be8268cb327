//! Local chat state kept by the client across reconnects.
//!
//! The server stores nothing, so this is the only copy of the conversation.

use pairchat_server::infrastructure::dto::websocket::MessageDto;

/// A user this client has been paired with, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub username: String,
    pub room: String,
}

#[derive(Debug, Clone)]
pub struct ChatView {
    username: String,
    /// Room requested or joined; kept across reconnects for rejoining
    room: Option<String>,
    peer: Option<String>,
    messages: Vec<MessageDto>,
    history: Vec<HistoryEntry>,
}

impl ChatView {
    pub fn new(username: String, room: Option<String>) -> Self {
        Self {
            username,
            room,
            peer: None,
            messages: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    pub fn messages(&self) -> &[MessageDto] {
        &self.messages
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn request_room(&mut self, room: String) {
        self.room = Some(room);
    }

    /// `room_full`: forget the requested room
    pub fn reject_room(&mut self) -> Option<String> {
        self.peer = None;
        self.room.take()
    }

    /// `chat_started`: remember the peer, and where we met them
    pub fn start_chat(&mut self, other_user: String) {
        let room = self.room.clone().unwrap_or_default();
        match self
            .history
            .iter_mut()
            .find(|entry| entry.username == other_user)
        {
            Some(entry) => entry.room = room,
            None => self.history.push(HistoryEntry {
                username: other_user.clone(),
                room,
            }),
        }
        self.peer = Some(other_user);
    }

    /// `user_left`
    pub fn peer_left(&mut self) -> Option<String> {
        self.peer.take()
    }

    /// Local `/leave`: drops the room and the conversation
    pub fn leave(&mut self) -> Option<String> {
        self.peer = None;
        self.messages.clear();
        self.room.take()
    }

    pub fn add(&mut self, message: MessageDto) {
        self.messages.push(message);
    }

    /// Replace the message with the same id. Returns whether one was found.
    pub fn apply_update(&mut self, updated: MessageDto) -> bool {
        match self.messages.iter_mut().find(|m| m.id == updated.id) {
            Some(message) => {
                *message = updated;
                true
            }
            None => false,
        }
    }

    /// Remove the message with `id`. Returns whether one was found.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    pub fn is_own(&self, message: &MessageDto) -> bool {
        message.author == self.username
    }

    /// My `index`-th message (1-based), counting only messages I wrote
    pub fn own_message(&self, index: usize) -> Option<&MessageDto> {
        let position = index.checked_sub(1)?;
        self.messages
            .iter()
            .filter(|m| self.is_own(m))
            .nth(position)
    }
}

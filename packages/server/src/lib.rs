//! Two-person chat room server.
//!
//! Pairs two anonymous participants into a room identified by a client-chosen
//! key and relays chat events (send, edit, delete) between them over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

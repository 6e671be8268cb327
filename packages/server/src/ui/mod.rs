//! UI layer: HTTP/WebSocket transport on top of the session coordinator.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::websocket::{FrameError, decode_frame};
pub use server::Server;

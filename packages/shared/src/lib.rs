//! Utilities shared by the Pairchat server and client.

pub mod logger;
pub mod time;

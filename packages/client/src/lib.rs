//! Terminal client for Pairchat.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
mod session;
mod ui;
pub mod view;

pub use runner::{ClientConfig, run_client};

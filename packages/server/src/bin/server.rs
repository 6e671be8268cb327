//! Pairchat server: pairs two connections per room key and relays their chat.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pairchat-server
//! cargo run --bin pairchat-server -- --host 0.0.0.0 --port 3001
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use pairchat_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, InMemorySessionRepository},
    },
    ui::Server,
    usecase::SessionCoordinator,
};
use pairchat_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "pairchat-server")]
#[command(about = "Two-person chat room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. SessionCoordinator
    // 4. Server

    // 1. Create Repositories (in-memory)
    let rooms = Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(HashMap::new()))));
    let sessions = Arc::new(InMemorySessionRepository::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create SessionCoordinator
    let coordinator = Arc::new(SessionCoordinator::new(
        rooms,
        sessions,
        message_pusher,
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    let server = Server::new(coordinator);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

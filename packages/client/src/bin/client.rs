//! Terminal client for Pairchat two-person chat rooms.
//!
//! Type messages and press Enter to send; `/help` lists the commands.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval) and rejoins the current room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pairchat-client -- --username alice --room R7
//! cargo run --bin pairchat-client -- -n bob -r R7
//! ```

use clap::Parser;

use pairchat_client::{ClientConfig, run_client};
use pairchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "pairchat-client")]
#[command(about = "Terminal client for two-person chat rooms", long_about = None)]
struct Args {
    /// Display name shown to the other user
    #[arg(short = 'n', long)]
    username: String,

    /// Room to join on startup
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3001/ws")]
    url: String,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if args.username.is_empty() {
        tracing::error!("Username must not be empty");
        std::process::exit(1);
    }

    let config = ClientConfig {
        url: args.url,
        username: args.username,
        room: args.room.filter(|room| !room.is_empty()),
    };
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

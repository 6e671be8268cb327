//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    domain::{is_connection_error, should_attempt_reconnect},
    error::ClientError,
    view::ChatView,
};

use super::{session::run_client_session, ui::spawn_input_thread};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Command-line configuration of one client run
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub username: String,
    /// Room to join as soon as the connection is up
    pub room: Option<String>,
}

/// Run the client with reconnection logic.
///
/// Returns `Ok` when the user quits. The local conversation and the current
/// room survive reconnects; the room is joined again on every new connection.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let view = Arc::new(Mutex::new(ChatView::new(
        config.username.clone(),
        config.room.clone(),
    )));
    let token = Uuid::new_v4().simple().to_string();
    let mut input_rx = spawn_input_thread(&config.username);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config.url, &token, view.clone(), &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if !is_connection_error(&e) {
                    return Err(e);
                }
                if matches!(e, ClientError::ConnectionLost) {
                    // The connection had been up; start counting again
                    reconnect_count = 0;
                }

                tracing::warn!("{}", e);
                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                }
                reconnect_count += 1;

                println!(
                    "\nConnection lost. Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS, reconnect_count, MAX_RECONNECT_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientEvent, ValueObjectError},
    infrastructure::dto::websocket::InboundEvent,
    ui::state::AppState,
};

/// Why an inbound text frame could not become a `ClientEvent`
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid payload: {0}")]
    Invalid(#[from] ValueObjectError),
}

/// Decode one text frame into a validated client event.
pub fn decode_frame(text: &str) -> Result<ClientEvent, FrameError> {
    let dto: InboundEvent = serde_json::from_str(text)?;
    Ok(ClientEvent::try_from(dto)?)
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards encoded events from `rx` to the WebSocket sink.
///
/// Ends when the channel closes (the connection was unregistered) or the
/// socket can no longer be written.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.coordinator.connect(tx).await;

    let coordinator = state.coordinator.clone();
    let id = connection_id.clone();

    // Events from one connection are handled strictly in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match decode_frame(text.as_str()) {
                    Ok(event) => coordinator.handle_event(&id, event).await,
                    Err(e) => {
                        tracing::warn!("Dropped frame from '{}': {}", id, e);
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.coordinator.disconnect(&connection_id).await;
}

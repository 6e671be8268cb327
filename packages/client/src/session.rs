//! One WebSocket connection to the server.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use pairchat_server::infrastructure::dto::websocket::{
    InboundEvent, JoinChatPayload, OutboundEvent,
};
use pairchat_shared::time::{get_unix_timestamp_millis, local_display_time};
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    command::{Command, parse_command},
    domain::{MessageStamp, apply_event, execute_command},
    error::ClientError,
    formatter::MessageFormatter,
    view::ChatView,
};

use super::ui::redisplay_prompt;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

async fn send_event(write: &mut WsSink, event: &InboundEvent) -> Result<(), ClientError> {
    let json = serde_json::to_string(event)?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ClientError::ConnectionLost)
}

/// Run one connection until the user quits (`Ok`) or the connection drops.
///
/// On connect, the room remembered in `view` (from `--room`, `/join` or a
/// previous connection) is joined again.
pub async fn run_client_session(
    url: &str,
    token: &str,
    view: Arc<Mutex<ChatView>>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();

    let (username, rejoin) = {
        let view = view.lock().await;
        (view.username().to_string(), view.room().map(str::to_string))
    };
    print!("{}", MessageFormatter::format_welcome(&username));
    if let Some(room) = rejoin {
        tracing::info!("Joining room '{}'", room);
        send_event(
            &mut write,
            &InboundEvent::JoinChat(JoinChatPayload {
                room,
                username: username.clone(),
            }),
        )
        .await?;
    }
    redisplay_prompt(&username);

    // Spawn a task to handle incoming events
    let view_for_read = view.clone();
    let username_for_read = username.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let output = match serde_json::from_str::<OutboundEvent>(text.as_str()) {
                        Ok(event) => {
                            tracing::debug!("Received {:?}", event);
                            apply_event(&mut *view_for_read.lock().await, event)
                        }
                        Err(e) => {
                            tracing::warn!("Unrecognized frame: {}", e);
                            MessageFormatter::format_raw_message(text.as_str())
                        }
                    };
                    if !output.is_empty() {
                        print!("{}", output);
                        redisplay_prompt(&username_for_read);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionLost);
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Ctrl+C / Ctrl+D
                    read_task.abort();
                    write.close().await.ok();
                    return Ok(());
                };

                let command = match parse_command(&line) {
                    Ok(Command::Quit) => {
                        read_task.abort();
                        write.close().await.ok();
                        return Ok(());
                    }
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt(&username);
                        continue;
                    }
                };

                let stamp = MessageStamp {
                    id: format!("{}{}", token, get_unix_timestamp_millis()),
                    time: local_display_time(),
                };
                let outcome = execute_command(&mut *view.lock().await, command, stamp);

                if let Some(output) = outcome.output {
                    print!("{}", output);
                }
                if let Some(event) = outcome.event
                    && let Err(e) = send_event(&mut write, &event).await
                {
                    read_task.abort();
                    return Err(e);
                }
                redisplay_prompt(&username);
            }
        }
    }
}

//! WebSocket connection handlers.
//!
//! Each socket runs as a pair of tasks: one reads frames and hands them to
//! the dispatcher, the other drains the connection's outbound queue into the
//! socket. Whichever finishes first aborts the other, and every exit path
//! ends in the same `disconnect` call.

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
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    ui::{
        dispatcher::{DispatchError, RelayDispatcher},
        state::AppState,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let max_message_bytes = state.config.max_message_bytes();
    ws.max_message_size(max_message_bytes)
        .max_frame_size(max_message_bytes)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the outbound queue into the WebSocket sink.
///
/// Ends when the socket rejects a write or the queue is closed by
/// unregistering the connection.
fn pusher_loop(
    mut rx: mpsc::Receiver<Arc<str>>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text((&*frame).into())).await.is_err() {
                break;
            }
        }
    })
}

fn log_dispatch_error(connection_id: &ConnectionId, error: &DispatchError) {
    match error {
        DispatchError::Encode(_) => {
            tracing::error!("Dropped event from '{}': {}", connection_id, error)
        }
        _ => tracing::warn!("Dropped event from '{}': {}", connection_id, error),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();
    let (tx, rx) = mpsc::channel(state.config.outbound_buffer);

    if let Err(e) = state.dispatcher.connect(connection_id.clone(), tx).await {
        tracing::error!("Failed to register connection: {}", e);
        return;
    }

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let dispatcher: Arc<RelayDispatcher> = state.dispatcher.clone();
    let reader_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    tracing::debug!("'{}' sent {} bytes", reader_id, text.len());
                    if let Err(e) = dispatcher.dispatch(&reader_id, text.as_str()).await {
                        log_dispatch_error(&reader_id, &e);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!("Ignoring binary frame from '{}'", reader_id);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("'{}' requested close", reader_id);
                    break;
                }
                // Ping/Pong is answered by axum
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", reader_id, e);
                    break;
                }
            }
        }
    });

    let reader_finished = tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            true
        }
        _ = &mut send_task => {
            recv_task.abort();
            false
        }
    };
    // No dispatch may run after cleanup
    if !reader_finished {
        let _ = recv_task.await;
    }

    state.dispatcher.disconnect(&connection_id).await;
}

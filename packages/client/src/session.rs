//! WebSocket client session management.
//!
//! One session is one connection to the relay. Lines typed at the prompt
//! arrive on a channel owned by the runner, so they survive reconnects.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures_util::{SinkExt, StreamExt, stream::SplitStream};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use walkie_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use crate::{
    clip,
    command::{Command, parse_command},
    domain::ClientState,
    error::ClientError,
    formatter::MessageFormatter,
    ui::print_with_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client state shared between the reader task and the input loop
pub type SharedState = Arc<Mutex<ClientState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, ClientState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What to do with one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send the event, then print the note if any
    Send(ClientEvent, Option<String>),
    /// Only print something locally
    Print(String),
    Quit,
}

/// Decide what a typed line means given the current state
pub async fn action_for(line: &str, state: &SharedState) -> Action {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => return Action::Print(format!("{}\n", e)),
    };
    let current_room = lock(state).room.clone();

    match command {
        Command::Quit => Action::Quit,
        Command::Help => Action::Print(MessageFormatter::format_help()),
        Command::Join(room_id) => Action::Send(ClientEvent::JoinRoom { room_id }, None),
        Command::Leave => match current_room {
            Some(room_id) => Action::Send(ClientEvent::LeaveRoom { room_id }, None),
            None => Action::Print("not in a room\n".to_string()),
        },
        Command::Send(path) => {
            let Some(room_id) = current_room else {
                return Action::Print("join a room first: /join <room>\n".to_string());
            };
            match clip::encode_file(&path).await {
                Ok(audio) => {
                    let note = MessageFormatter::format_sent_confirmation(&path, audio.len());
                    Action::Send(ClientEvent::AudioMessage { room_id, audio }, Some(note))
                }
                Err(e) => Action::Print(format!("cannot send {}: {}\n", path.display(), e)),
            }
        }
    }
}

/// Render an event for display, updating state and saving clips on the way
async fn render_event(state: &SharedState, event: ServerEvent, save_dir: Option<&Path>) -> String {
    let me = {
        let mut state = lock(state);
        state.apply(&event);
        state.user_id.clone()
    };

    match event {
        ServerEvent::Connected { user_id, timestamp } => {
            MessageFormatter::format_connected(&user_id, &timestamp)
        }
        ServerEvent::RoomJoined {
            room_id,
            members,
            timestamp,
        } => MessageFormatter::format_room_joined(&room_id, &members, me.as_deref(), &timestamp),
        ServerEvent::RoomLeft { room_id, timestamp } => {
            MessageFormatter::format_room_left(&room_id, &timestamp)
        }
        ServerEvent::UserJoined {
            user_id,
            room_id,
            timestamp,
        } => MessageFormatter::format_user_joined(&user_id, &room_id, &timestamp),
        ServerEvent::UserLeft {
            user_id,
            room_id,
            timestamp,
        } => MessageFormatter::format_user_left(&user_id, &room_id, &timestamp),
        ServerEvent::AudioMessage {
            audio,
            sender_id,
            timestamp,
            ..
        } => {
            let saved = match save_dir {
                Some(dir) => match clip::save(dir, &sender_id, &timestamp, &audio).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::warn!("Failed to save clip from '{}': {}", sender_id, e);
                        None
                    }
                },
                None => None,
            };
            MessageFormatter::format_audio(&sender_id, audio.len(), &timestamp, saved.as_deref())
        }
    }
}

async fn read_loop(
    mut read: SplitStream<WsStream>,
    state: SharedState,
    save_dir: Option<PathBuf>,
) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let output = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(event) => render_event(&state, event, save_dir.as_deref()).await,
                    Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                };
                print_with_prompt(&output);
            }
            Ok(Message::Binary(data)) => {
                print_with_prompt(&MessageFormatter::format_binary_message(data.len()));
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
}

fn encode(event: &ClientEvent) -> Result<Message, ClientError> {
    serde_json::to_string(event)
        .map(Message::text)
        .map_err(|e| ClientError::Io(e.into()))
}

/// Run one WebSocket client session
///
/// # Returns
///
/// * `Ok(())` - The user quit
/// * `Err(ClientError::ConnectionError)` - The relay could not be reached
/// * `Err(ClientError::ConnectionLost)` - The connection dropped mid-session
pub async fn run_client_session(
    url: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
    state: &SharedState,
    save_dir: Option<&Path>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to relay at {}", url);

    let (mut write, read) = ws_stream.split();

    let rejoin = {
        let mut state = lock(state);
        state.user_id = None;
        state.room.clone()
    };
    if let Some(room_id) = rejoin {
        tracing::info!("Joining room '{}'", room_id);
        write
            .send(encode(&ClientEvent::JoinRoom { room_id })?)
            .await
            .map_err(|_| ClientError::ConnectionLost)?;
    }

    let mut read_task = tokio::spawn(read_loop(
        read,
        state.clone(),
        save_dir.map(Path::to_path_buf),
    ));

    loop {
        tokio::select! {
            _ = &mut read_task => return Err(ClientError::ConnectionLost),
            line = input.recv() => {
                let Some(line) = line else { break };
                match action_for(&line, state).await {
                    Action::Send(event, note) => {
                        if let Err(e) = write.send(encode(&event)?).await {
                            tracing::warn!("Failed to send: {}", e);
                            read_task.abort();
                            return Err(ClientError::ConnectionLost);
                        }
                        if let Some(note) = note {
                            print_with_prompt(&note);
                        }
                    }
                    Action::Print(output) => print_with_prompt(&output),
                    Action::Quit => break,
                }
            }
        }
    }

    read_task.abort();
    let _ = write.close().await;
    Ok(())
}

//! Client execution logic with reconnection support.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use super::{
    domain::{ClientState, should_attempt_reconnect},
    error::ClientError,
    session::run_client_session,
    ui::PROMPT,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Read lines on a dedicated thread (rustyline is blocking).
///
/// The channel closes on Ctrl+C, Ctrl+D, or a terminal error.
fn spawn_input_thread() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Run the client with reconnection logic
///
/// # Arguments
///
/// * `url` - WebSocket endpoint of the relay
/// * `room` - Room to join as soon as the connection is up
/// * `save_dir` - Where to write received clips, if anywhere
pub async fn run_client(
    url: String,
    room: Option<String>,
    save_dir: Option<PathBuf>,
) -> Result<(), ClientError> {
    let state = Arc::new(Mutex::new(ClientState::new(room)));
    let mut input = spawn_input_thread();
    let mut reconnect_count = 0;

    println!("\nType /help for commands. Press Ctrl+C to exit.\n");

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS + 1
        );

        match run_client_session(&url, &mut input, &state, save_dir.as_deref()).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                // A session that got connected starts a fresh series of retries
                if matches!(e, ClientError::ConnectionLost) {
                    reconnect_count = 0;
                }

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!("Not reconnecting ({} attempts made)", reconnect_count);
                    return Err(e);
                }
                reconnect_count += 1;

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count,
                    MAX_RECONNECT_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

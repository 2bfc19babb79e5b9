//! Push-to-talk command-line client.
//!
//! Connects to a Walkie relay, joins a room, sends audio files and prints (or
//! saves) the clips other members send. Reconnects automatically (max 5
//! attempts with 5 second interval) and re-joins the last room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin walkie-client -- --room 42
//! cargo run --bin walkie-client -- -u ws://relay.example:3001/ws -r 42 --save-dir ./inbox
//! ```

use std::path::PathBuf;

use clap::Parser;
use walkie_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "walkie-client")]
#[command(about = "Push-to-talk client for the Walkie relay", long_about = None)]
struct Args {
    /// WebSocket endpoint of the relay
    #[arg(short = 'u', long, env = "WALKIE_URL", default_value = "ws://127.0.0.1:3001/ws")]
    url: String,

    /// Room to join right after connecting
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// Directory where received clips are saved
    #[arg(short = 's', long)]
    save_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = walkie_client::run_client(args.url, args.room, args.save_dir).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

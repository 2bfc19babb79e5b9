//! Walkie-talkie relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin walkie-server
//! cargo run --bin walkie-server -- --host 0.0.0.0 --port 3001 --room-policy trust-client
//! ```

use std::sync::Arc;

use clap::Parser;
use walkie_server::{
    config::{DEFAULT_MAX_AUDIO_BYTES, DEFAULT_OUTBOUND_BUFFER, RelayConfig, RoomPolicy},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
};
use walkie_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "walkie-server")]
#[command(about = "Room-based push-to-talk relay over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "WALKIE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Largest audio payload accepted from a client, in bytes
    #[arg(long, env = "WALKIE_MAX_AUDIO_BYTES", default_value_t = DEFAULT_MAX_AUDIO_BYTES)]
    max_audio_bytes: usize,

    /// Frames queued per connection before further frames to it are dropped
    #[arg(long, env = "WALKIE_OUTBOUND_BUFFER", default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,

    /// How audio is checked against the sender's current room
    #[arg(long, env = "WALKIE_ROOM_POLICY", value_enum, default_value_t = RoomPolicy::Enforce)]
    room_policy: RoomPolicy,
}

impl From<&Args> for RelayConfig {
    fn from(args: &Args) -> Self {
        Self {
            max_audio_bytes: args.max_audio_bytes,
            outbound_buffer: args.outbound_buffer.max(1),
            room_policy: args.room_policy,
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = RelayConfig::from(&args);

    // Repository -> MessagePusher -> Server (UseCases are built inside)
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let server = Server::new(repository, message_pusher, Arc::new(SystemClock), config);

    if let Err(e) = server.run(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

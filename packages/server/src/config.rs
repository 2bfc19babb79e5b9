//! Relay configuration.

use clap::ValueEnum;

/// Default upper bound of an audio payload (5 MiB)
pub const DEFAULT_MAX_AUDIO_BYTES: usize = 5 * 1024 * 1024;

/// Default capacity of each connection's outbound queue
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Allowance for the JSON envelope around the audio payload in a WebSocket frame
const ENVELOPE_HEADROOM_BYTES: usize = 4 * 1024;

/// How an `audio-message` is checked against the sender's current room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RoomPolicy {
    /// Drop audio whose room id differs from the room the sender is in
    #[default]
    Enforce,
    /// Forward to the room named in the message, wherever the sender is.
    /// A sender in no room is still refused.
    TrustClient,
}

/// Runtime settings of the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub max_audio_bytes: usize,
    pub outbound_buffer: usize,
    pub room_policy: RoomPolicy,
}

impl RelayConfig {
    /// Largest WebSocket message accepted from a client
    pub fn max_message_bytes(&self) -> usize {
        self.max_audio_bytes + ENVELOPE_HEADROOM_BYTES
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            room_policy: RoomPolicy::default(),
        }
    }
}

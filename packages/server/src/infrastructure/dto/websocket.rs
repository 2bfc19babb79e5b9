//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame with a `type` discriminator and camelCase
//! fields, e.g. `{"type":"join-room","roomId":"42"}`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Events sent from a client to the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    JoinRoom { room_id: String },
    LeaveRoom { room_id: String },
    AudioMessage { room_id: String, audio: String },
}

/// Events sent from the relay to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Greeting carrying the identifier assigned to the connection
    Connected { user_id: String, timestamp: String },
    /// Confirmation of a join, with the room's current members
    RoomJoined {
        room_id: String,
        members: Vec<String>,
        timestamp: String,
    },
    /// Confirmation of a leave
    RoomLeft { room_id: String, timestamp: String },
    /// Audio clip relayed from another member of the room
    AudioMessage {
        audio: String,
        sender_id: String,
        room_id: String,
        timestamp: String,
    },
    UserJoined {
        user_id: String,
        room_id: String,
        timestamp: String,
    },
    UserLeft {
        user_id: String,
        room_id: String,
        timestamp: String,
    },
}

impl ServerEvent {
    /// Serialize once into a shared text frame for fan-out
    pub fn to_frame(&self) -> Result<Arc<str>, serde_json::Error> {
        serde_json::to_string(self).map(Arc::from)
    }
}

//! Domain logic for client-side operations.
//!
//! Pure functions and state transitions, kept free of I/O so they are easy
//! to test.

use walkie_server::infrastructure::dto::websocket::ServerEvent;

use crate::error::ClientError;

/// What the client knows about itself
///
/// Survives reconnects: the room is re-joined on the next connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Identifier assigned by the relay for the current connection
    pub user_id: Option<String>,
    /// Room confirmed by the relay most recently
    pub room: Option<String>,
}

impl ClientState {
    /// State before the first connection, optionally with a room to join
    pub fn new(room: Option<String>) -> Self {
        Self {
            user_id: None,
            room,
        }
    }

    /// Update from an event received from the relay
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::Connected { user_id, .. } => self.user_id = Some(user_id.clone()),
            ServerEvent::RoomJoined { room_id, .. } => self.room = Some(room_id.clone()),
            ServerEvent::RoomLeft { room_id, .. } if self.room.as_ref() == Some(room_id) => {
                self.room = None
            }
            _ => {}
        }
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that ended the session
/// * `current_attempt` - Reconnection attempts made so far (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    let recoverable = matches!(
        error,
        ClientError::ConnectionError(_) | ClientError::ConnectionLost
    );
    recoverable && current_attempt < max_attempts
}

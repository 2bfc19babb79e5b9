//! Room-based push-to-talk relay.
//!
//! Clients connect over WebSocket, join a room by id, and send recorded audio
//! clips. The relay forwards each clip to every other member of the sender's
//! room and nobody else.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

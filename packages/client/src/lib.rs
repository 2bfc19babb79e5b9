//! Command-line push-to-talk client for the Walkie relay.
//!
//! Reads commands from stdin, ships audio files as `data:` URLs, and prints
//! (or saves) the clips other members of the room send.

pub mod clip;
pub mod command;
mod domain;
pub mod error;
mod formatter;
mod runner;
pub mod session;
mod ui;

pub use domain::ClientState;
pub use error::ClientError;
pub use runner::run_client;

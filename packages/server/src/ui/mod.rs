//! WebSocket relay server and read-only HTTP API.

pub mod dispatcher;
mod handler;
mod server;
mod signal;
pub mod state;

pub use dispatcher::{DispatchError, RelayDispatcher};
pub use server::Server;

//! Error types for the client.

use thiserror::Error;

use crate::clip::ClipError;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the relay
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection went away
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

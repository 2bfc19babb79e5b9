//! Utilities shared by the Walkie relay and client.

pub mod logger;
pub mod time;

//! Infrastructure layer
//!
//! ドメイン層のポートの具体的な実装と、外部とやり取りする DTO。

pub mod dto;
pub mod message_pusher;
pub mod repository;

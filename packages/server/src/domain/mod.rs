//! Domain layer
//!
//! 外部に依存しないドメインモデルと、ドメインが必要とするポート（trait）。

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, JoinOutcome, Room, RoomRegistry};
pub use error::{DomainError, MessagePushError, RepositoryError};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{AudioClip, ConnectionId, ConnectionIdFactory, RoomId, Timestamp};

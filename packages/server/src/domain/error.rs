//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成時に発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id is too long ({len} chars, max {max})")]
    RoomIdTooLong { len: usize, max: usize },

    #[error("audio payload must not be empty")]
    EmptyAudio,

    #[error("audio payload is too large ({size} bytes, max {max})")]
    AudioTooLarge { size: usize, max: usize },
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("outbound queue of client '{0}' is full")]
    ChannelFull(String),

    #[error("outbound channel of client '{0}' is closed")]
    ChannelClosed(String),
}

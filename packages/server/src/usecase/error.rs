//! UseCase 層のエラー定義

use thiserror::Error;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection id '{0}' is already in use")]
    DuplicateConnectionId(String),
}

/// Room 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// 接続が登録されていない（切断処理の後に届いた join など）
    #[error("connection '{0}' is not registered")]
    NotRegistered(String),
}

/// Room 退出処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    /// 接続が指定の Room にいない（無視してよい）
    #[error("connection is not in room '{0}'")]
    NotInRoom(String),
}

/// 音声転送処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayAudioError {
    /// 送信者の現在の Room とメッセージの Room が一致しない
    #[error("sender is in {current:?}, not in room '{requested}'")]
    NotInRoom {
        requested: String,
        current: Option<String>,
    },
}

/// Room 取得処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomError {
    #[error("room not found")]
    RoomNotFound,
}

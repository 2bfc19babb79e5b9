//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続の登録（Repository と MessagePusher の両方）
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録と挨拶メッセージの送信
//! - 異常系：同じ ConnectionId での二重登録

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomRepository, Timestamp,
};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続を登録する
    ///
    /// 接続直後はどの Room にも所属しない。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - Transport Listener が採番した ID
    /// * `sender` - クライアントへの送信キュー
    /// * `connected_at` - 接続時刻
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
        connected_at: Timestamp,
    ) -> Result<(), ConnectError> {
        self.repository
            .register_connection(connection_id.clone(), connected_at)
            .await
            .map_err(|_| ConnectError::DuplicateConnectionId(connection_id.to_string()))?;

        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(())
    }

    /// 接続したクライアント自身にメッセージを送る
    pub async fn greet(
        &self,
        connection_id: &ConnectionId,
        message: Arc<str>,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }
}

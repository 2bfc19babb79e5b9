//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時の Room からの削除、MessagePusher からの登録解除、通知対象の選定
//!
//! ### なぜこのテストが必要か
//! - 切断した接続が Room に残り続けないことを保証する
//! - 正常終了・エラー・タイムアウトなど複数の経路から呼ばれても 1 回分の効果しか持たないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：Room に所属していた接続の切断（残りのメンバーが通知対象）
//! - エッジケース：どの Room にも所属していない接続の切断、最後のメンバーの切断
//! - 異常系：既に切断済みの接続の再切断（何も起きない）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// 何度呼んでも安全（2 回目以降は `None`）。
    ///
    /// # Returns
    ///
    /// * `Some((room_id, remaining))` - 所属していた Room と、そこに残っているメンバー
    /// * `None` - どの Room にも所属していなかった、または切断済み
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<(RoomId, Vec<ConnectionId>)> {
        let former_room = self.repository.remove_connection(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;

        let room_id = former_room?;
        let remaining = self
            .repository
            .members_except(&room_id, connection_id)
            .await;
        tracing::info!(
            "'{}' disconnected from room '{}' ({} members remain)",
            connection_id,
            room_id,
            remaining.len()
        );

        Some((room_id, remaining))
    }

    /// 残りのメンバーに退出を通知する
    pub async fn notify(&self, targets: Vec<ConnectionId>, message: Arc<str>) -> usize {
        self.message_pusher.broadcast(targets, message).await
    }
}

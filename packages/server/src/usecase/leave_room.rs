//! UseCase: Room 退出処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, RoomId, RoomRepository};

use super::error::LeaveRoomError;

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Room からの退出を実行
    ///
    /// 接続が `room_id` に所属していない場合は何もせず `NotInRoom` を返す。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - Room に残っているメンバー（通知対象）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, LeaveRoomError> {
        if self.repository.room_of(connection_id).await.as_ref() != Some(room_id) {
            return Err(LeaveRoomError::NotInRoom(room_id.to_string()));
        }

        if !self.repository.leave_room(room_id, connection_id).await {
            // room_of の確認後に切断処理が割り込んだ
            return Err(LeaveRoomError::NotInRoom(room_id.to_string()));
        }
        tracing::info!("'{}' left room '{}'", connection_id, room_id);

        Ok(self
            .repository
            .members_except(room_id, connection_id)
            .await)
    }

    /// 退出した本人に確認メッセージを送る
    pub async fn reply(
        &self,
        connection_id: &ConnectionId,
        message: Arc<str>,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }

    /// 残りのメンバーに退出を通知する
    pub async fn notify(&self, targets: Vec<ConnectionId>, message: Arc<str>) -> usize {
        self.message_pusher.broadcast(targets, message).await
    }
}

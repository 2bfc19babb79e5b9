//! UseCase: Room 参加処理
//!
//! 1 つの接続は同時に 1 つの Room にしか所属しない。
//! 別の Room にいる状態で join した場合は、元の Room から抜けてから参加する。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, JoinOutcome, MessagePushError, MessagePusher, RoomId, RoomRepository, Timestamp,
};

use super::error::JoinRoomError;

/// join の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRoomOutput {
    /// 既に同じ Room にいた場合は `true`（他のメンバーへの通知は不要）
    pub already_member: bool,
    /// 移動元の Room と、そこに残っているメンバー
    pub previous: Option<(RoomId, Vec<ConnectionId>)>,
    /// 参加先の Room の、自分以外のメンバー
    pub peers: Vec<ConnectionId>,
}

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Room への参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(JoinRoomOutput)` - 参加・移動・再 join の結果
    /// * `Err(JoinRoomError::NotRegistered)` - 接続が登録されていない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        timestamp: Timestamp,
    ) -> Result<JoinRoomOutput, JoinRoomError> {
        let outcome = self
            .repository
            .join_room(room_id, connection_id, timestamp)
            .await;

        let (already_member, previous) = match outcome {
            JoinOutcome::NotRegistered => {
                return Err(JoinRoomError::NotRegistered(connection_id.to_string()));
            }
            JoinOutcome::AlreadyMember => (true, None),
            JoinOutcome::Joined { previous: None } => (false, None),
            JoinOutcome::Joined {
                previous: Some(previous),
            } => {
                let remaining = self
                    .repository
                    .members_except(&previous, connection_id)
                    .await;
                (false, Some((previous, remaining)))
            }
        };

        let peers = self
            .repository
            .members_except(room_id, connection_id)
            .await;

        match &previous {
            _ if already_member => {
                tracing::debug!("'{}' is already in room '{}'", connection_id, room_id)
            }
            Some((previous_room, _)) => tracing::info!(
                "'{}' moved from room '{}' to room '{}'",
                connection_id,
                previous_room,
                room_id
            ),
            None => tracing::info!("'{}' joined room '{}'", connection_id, room_id),
        }

        Ok(JoinRoomOutput {
            already_member,
            previous,
            peers,
        })
    }

    /// 参加した本人に確認メッセージを送る
    pub async fn reply(
        &self,
        connection_id: &ConnectionId,
        message: Arc<str>,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }

    /// 他のメンバーに参加・退出を通知する
    pub async fn notify(&self, targets: Vec<ConnectionId>, message: Arc<str>) -> usize {
        self.message_pusher.broadcast(targets, message).await
    }
}

//! UseCase: 音声転送処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayAudioUseCase::execute() メソッド
//! - 転送先の選定（送信者以外の Room メンバー）と RoomPolicy による検証
//!
//! ### なぜこのテストが必要か
//! - 送信者自身に音声が戻らないことを保証する
//! - 別の Room のメンバーに音声が漏れないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：Room メンバーへのファンアウト
//! - 異常系：送信者が別の Room にいる（Enforce では拒否、TrustClient では転送）
//! - 異常系：送信者がどの Room にもいない（どちらの RoomPolicy でも拒否）
//! - エッジケース：送信者以外のメンバーがいない（転送先なし、エラーにもならない）
//! - 拒否・転送先なしの場合はメッセージを組み立てない

use std::sync::Arc;

use crate::{
    config::RoomPolicy,
    domain::{ConnectionId, MessagePusher, RoomId, RoomRepository},
};

use super::error::RelayAudioError;

/// 転送結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReport {
    /// 転送対象（送信者を除く Room メンバー）
    pub targets: Vec<ConnectionId>,
    /// 実際に送信キューに積めた件数
    pub delivered: usize,
}

/// 音声転送のユースケース
pub struct RelayAudioUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    policy: RoomPolicy,
}

impl RelayAudioUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        policy: RoomPolicy,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            policy,
        }
    }

    /// 音声転送を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続 ID
    /// * `room_id` - メッセージに書かれた Room ID
    /// * `build_message` - 転送するメッセージを組み立てる（UI 層で生成）。
    ///   転送先が 1 件以上ある場合にのみ呼ばれる
    ///
    /// # Returns
    ///
    /// * `Ok(RelayReport)` - 転送対象と送信できた件数
    /// * `Err(E)` - RoomPolicy により拒否された、またはメッセージを組み立てられなかった
    pub async fn execute<F, E>(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        build_message: F,
    ) -> Result<RelayReport, E>
    where
        F: FnOnce() -> Result<Arc<str>, E>,
        E: From<RelayAudioError>,
    {
        let current = self.repository.room_of(sender).await;
        let permitted = match (&current, self.policy) {
            (None, _) => false,
            (Some(current), RoomPolicy::Enforce) => current == room_id,
            (Some(_), RoomPolicy::TrustClient) => true,
        };
        if !permitted {
            return Err(RelayAudioError::NotInRoom {
                requested: room_id.to_string(),
                current: current.map(RoomId::into_string),
            }
            .into());
        }

        let targets = self.repository.members_except(room_id, sender).await;
        if targets.is_empty() {
            tracing::debug!("No peers for audio from '{}' in room '{}'", sender, room_id);
            return Ok(RelayReport {
                targets,
                delivered: 0,
            });
        }

        let message = build_message()?;
        let delivered = self
            .message_pusher
            .broadcast(targets.clone(), message)
            .await;

        tracing::debug!(
            "Relayed audio from '{}' in room '{}' to {}/{} peers",
            sender,
            room_id,
            delivered,
            targets.len()
        );

        Ok(RelayReport { targets, delivered })
    }
}

//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）のインターフェース。
//! 送信は fire-and-forget で、失敗しても再送しない。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// クライアントへの送信キュー
///
/// シリアライズ済みのメッセージを `Arc<str>` で共有し、
/// ファンアウト時に音声データを宛先ごとに複製しない。
pub type PusherChannel = mpsc::Sender<Arc<str>>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信キューを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: Arc<str>,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信し、届けられた件数を返す
    ///
    /// 一部の宛先への送信失敗は残りの宛先への送信を妨げない。
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: Arc<str>) -> usize;
}

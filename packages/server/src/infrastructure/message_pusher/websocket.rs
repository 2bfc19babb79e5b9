//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（bounded `mpsc::Sender`）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信キューを受け取り、メッセージ送信に使用します。
//!
//! 送信には `try_send` を使い、決して await しません。
//! キューが溢れた宛先のメッセージは破棄され、他の宛先への送信や
//! 次の受信イベントの処理は遅い宛先に引きずられません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.push_to(&connection_id, Arc::from("{\"type\":\"connected\"}")).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: ConnectionId, Value: 送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

fn try_push(
    connection_id: &ConnectionId,
    sender: &PusherChannel,
    content: Arc<str>,
) -> Result<(), MessagePushError> {
    sender.try_send(content).map_err(|e| match e {
        TrySendError::Full(_) => MessagePushError::ChannelFull(connection_id.to_string()),
        TrySendError::Closed(_) => MessagePushError::ChannelClosed(connection_id.to_string()),
    })
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: Arc<str>,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        try_push(connection_id, sender, content)?;
        tracing::debug!("Pushed message to client '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: Arc<str>) -> usize {
        let clients = self.clients.lock().await;
        let mut delivered = 0;

        for target in targets {
            let Some(sender) = clients.get(&target) else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容し、再送もしない
            match try_push(&target, sender, content.clone()) {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!("Broadcasted message to client '{}'", target);
                }
                Err(e) => tracing::warn!("Failed to push message: {}", e),
            }
        }

        delivered
    }
}

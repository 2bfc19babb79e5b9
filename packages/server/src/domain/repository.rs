//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, JoinOutcome, RepositoryError, Room, RoomId, Timestamp};

/// Room Repository trait
///
/// Room と接続の対応表（Room Registry）へのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// join / leave / members_except / room_of の各操作は互いにアトミックであること。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 新しい接続を登録
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// 接続を Room に参加させる（別の Room にいた場合は移動）
    async fn join_room(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        timestamp: Timestamp,
    ) -> JoinOutcome;

    /// 接続を Room から外す。変更があった場合に `true`
    async fn leave_room(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool;

    /// Room のメンバーから `excluded` を除いた接続 ID を取得
    async fn members_except(&self, room_id: &RoomId, excluded: &ConnectionId)
    -> Vec<ConnectionId>;

    /// 接続が現在所属している Room を取得
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// 接続を削除し、所属していた Room を返す
    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// 全ての Room を取得
    async fn get_rooms(&self) -> Vec<Room>;

    /// Room を取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 接続中のクライアント数を取得
    async fn count_connections(&self) -> usize;
}

//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomRegistry` を 1 つの Mutex で保護し、インメモリ DB として使用します。
//!
//! 全ての操作は同じロックを取るため、join / leave / members_except / room_of は
//! 互いに競合しません。状態はプロセス再起動で失われます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, JoinOutcome, RepositoryError, Room, RoomId, RoomRegistry, RoomRepository,
    Timestamp,
};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    registry: Mutex<RoomRegistry>,
}

impl InMemoryRoomRepository {
    /// 空のレジストリで InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        if registry.register(connection_id.clone(), connected_at) {
            Ok(())
        } else {
            Err(RepositoryError::DuplicateConnection(
                connection_id.into_string(),
            ))
        }
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        timestamp: Timestamp,
    ) -> JoinOutcome {
        let mut registry = self.registry.lock().await;
        registry.join(room_id, connection_id, timestamp)
    }

    async fn leave_room(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let mut registry = self.registry.lock().await;
        registry.leave(room_id, connection_id)
    }

    async fn members_except(
        &self,
        room_id: &RoomId,
        excluded: &ConnectionId,
    ) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        registry.members_except(room_id, excluded)
    }

    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let registry = self.registry.lock().await;
        registry.room_of(connection_id).cloned()
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let mut registry = self.registry.lock().await;
        registry.remove_connection(connection_id)
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        let mut rooms: Vec<Room> = registry.rooms().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.room(room_id).cloned()
    }

    async fn count_connections(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.connection_count()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository が RoomRegistry の操作を正しく委譲すること
    // - 並行アクセス時に更新が失われないこと
    //
    // 【どのようなシナリオをテストするか】
    // 1. 接続の登録と重複登録
    // 2. join / leave と Room 一覧
    // 3. 50 接続の同時 join
    // ========================================

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_connection_success() {
        // テスト項目: 接続を登録すると接続数に反映される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo
            .register_connection(conn("alice"), Timestamp::new(1000))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repo.count_connections().await, 1);
        assert_eq!(repo.room_of(&conn("alice")).await, None);
    }

    #[tokio::test]
    async fn test_register_connection_duplicate() {
        // テスト項目: 同じ ID の二重登録はエラーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.register_connection(conn("alice"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let result = repo
            .register_connection(conn("alice"), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::DuplicateConnection("alice".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_rooms_sorted_by_id() {
        // テスト項目: Room 一覧が ID 順で取得できる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let now = Timestamp::new(1000);
        for (who, target) in [("alice", "b"), ("bob", "a")] {
            repo.register_connection(conn(who), now).await.unwrap();
            repo.join_room(&room(target), &conn(who), now).await;
        }

        // when (操作):
        let rooms = repo.get_rooms().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_leave_room_removes_room() {
        // テスト項目: 最後のメンバーが抜けた Room は取得できなくなる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.register_connection(conn("alice"), Timestamp::new(1000))
            .await
            .unwrap();
        repo.join_room(&room("42"), &conn("alice"), Timestamp::new(1000))
            .await;

        // when (操作):
        let changed = repo.leave_room(&room("42"), &conn("alice")).await;

        // then (期待する結果):
        assert!(changed);
        assert!(repo.get_room(&room("42")).await.is_none());
        assert!(repo.get_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_room_unregistered_connection() {
        // テスト項目: 登録されていない接続の join は NotRegistered になり、Room は作られない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let outcome = repo
            .join_room(&room("42"), &conn("ghost"), Timestamp::new(1000))
            .await;

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::NotRegistered);
        assert!(repo.get_rooms().await.is_empty());
        assert_eq!(repo.count_connections().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_are_not_lost() {
        // テスト項目: 50 接続が同時に join しても更新が失われず、重複もない
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new());
        let lobby = room("lobby");

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..50 {
            let repo = repo.clone();
            let lobby = lobby.clone();
            handles.push(tokio::spawn(async move {
                let id = conn(&format!("conn-{i}"));
                repo.register_connection(id.clone(), Timestamp::new(i))
                    .await
                    .unwrap();
                repo.join_room(&lobby, &id, Timestamp::new(i)).await;
                // 冪等性も同時に確認する
                repo.join_room(&lobby, &id, Timestamp::new(i)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let lobby_room = repo.get_room(&lobby).await.unwrap();
        assert_eq!(lobby_room.members.len(), 50);
        let outsider = conn("outsider");
        let members: HashSet<ConnectionId> = repo
            .members_except(&lobby, &outsider)
            .await
            .into_iter()
            .collect();
        assert_eq!(members.len(), 50);
        assert_eq!(repo.count_connections().await, 50);
    }
}

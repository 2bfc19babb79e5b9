//! Entities
//!
//! ## 概要
//!
//! - `Connection`: 1 本の接続と、その接続が現在所属している Room
//! - `Room`: Room ID と所属する接続の集合
//! - `RoomRegistry`: 「誰が誰の音声を聞くか」を決める唯一の情報源
//!
//! ## Room のライフサイクル
//!
//! Room は最初の join で暗黙に作成され、メンバーが 0 人になった時点で
//! レジストリから削除される。メンバー 0 人の Room と、一度も存在しなかった
//! Room は区別できない。

use std::collections::{HashMap, HashSet, hash_map::Entry};

use super::value_object::{ConnectionId, RoomId, Timestamp};

/// 接続エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// 現在の Room（join 前は None）
    pub room: Option<RoomId>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            room: None,
            connected_at,
        }
    }
}

/// Room エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub members: HashSet<ConnectionId>,
    pub created_at: Timestamp,
}

impl Room {
    fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: HashSet::new(),
            created_at,
        }
    }

    /// メンバー ID をソートして返す（表示・レスポンス用）
    pub fn sorted_members(&self) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self.members.iter().cloned().collect();
        members.sort();
        members
    }
}

/// `RoomRegistry::join` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// 新たに Room に参加した。別の Room から移動した場合は `previous` に元の Room が入る
    Joined { previous: Option<RoomId> },
    /// 既に同じ Room のメンバーだった（何も変更していない）
    AlreadyMember,
    /// 登録されていない接続（何も変更していない）
    NotRegistered,
}

/// Room と接続の対応表
///
/// 1 つの接続は同時に最大 1 つの Room にのみ所属する。
/// 別の Room に join すると、所属は追加ではなく移動になる。
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    connections: HashMap<ConnectionId, Connection>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続を登録する。既に登録済みなら `false` を返し、何も変更しない
    pub fn register(&mut self, connection_id: ConnectionId, connected_at: Timestamp) -> bool {
        match self.connections.entry(connection_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                let connection = Connection::new(entry.key().clone(), connected_at);
                entry.insert(connection);
                true
            }
        }
    }

    /// 接続を Room に参加させる
    ///
    /// - Room が存在しなければ作成する
    /// - 同じ Room への再 join は冪等（重複メンバーは発生しない）
    /// - 別の Room に所属していた場合は先にそちらから抜ける
    /// - `register` されていない接続は参加させない
    pub fn join(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> JoinOutcome {
        let Some(connection) = self.connections.get(connection_id) else {
            return JoinOutcome::NotRegistered;
        };
        let current = connection.room.clone();
        if current.as_ref() == Some(room_id) {
            return JoinOutcome::AlreadyMember;
        }

        let previous = match current {
            Some(previous) => {
                self.leave(&previous, connection_id);
                Some(previous)
            }
            None => None,
        };

        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), now))
            .members
            .insert(connection_id.clone());

        if let Some(connection) = self.connections.get_mut(connection_id) {
            connection.room = Some(room_id.clone());
        }

        JoinOutcome::Joined { previous }
    }

    /// 接続を Room から外す。メンバーでなければ何もしない
    ///
    /// Room が空になったらエントリごと削除する。変更があった場合に `true` を返す。
    pub fn leave(&mut self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return false;
        };
        if !room.members.remove(connection_id) {
            return false;
        }
        if room.members.is_empty() {
            self.rooms.remove(room_id);
        }

        if let Some(connection) = self.connections.get_mut(connection_id)
            && connection.room.as_ref() == Some(room_id)
        {
            connection.room = None;
        }
        true
    }

    /// Room のメンバーから `excluded` を除いた接続 ID を返す。未知の Room なら空
    pub fn members_except(&self, room_id: &RoomId, excluded: &ConnectionId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| {
                room.members
                    .iter()
                    .filter(|id| *id != excluded)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 接続が現在所属している Room
    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.connections
            .get(connection_id)
            .and_then(|connection| connection.room.as_ref())
    }

    /// 接続を Room から外し、登録も削除する。抜けた Room を返す
    ///
    /// 何度呼んでも安全（2 回目以降は `None`）。
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Option<RoomId> {
        let connection = self.connections.remove(connection_id)?;
        let room_id = connection.room?;
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.members.remove(connection_id);
            if room.members.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
        Some(room_id)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn connection(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(connection_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn ts() -> Timestamp {
        Timestamp::new(1_000)
    }

    /// 指定した接続を登録済みのレジストリ
    fn registry_with(ids: &[&str]) -> RoomRegistry {
        let mut registry = RoomRegistry::new();
        for id in ids {
            registry.register(conn(id), ts());
        }
        registry
    }

    #[test]
    fn test_join_creates_room_on_first_member() {
        // テスト項目: 最初の join で Room が作成される
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);

        // when (操作):
        let outcome = registry.join(&room("42"), &conn("alice"), ts());

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::Joined { previous: None });
        assert_eq!(registry.room_count(), 1);
        assert_eq!(registry.room_of(&conn("alice")), Some(&room("42")));
    }

    #[test]
    fn test_join_unregistered_connection_is_refused() {
        // テスト項目: register されていない接続の join は何も変更しない
        // given (前提条件):
        let mut registry = RoomRegistry::new();

        // when (操作):
        let outcome = registry.join(&room("42"), &conn("ghost"), ts());

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::NotRegistered);
        assert_eq!(registry.room_count(), 0);
        assert_eq!(registry.connection_count(), 0);
        assert!(registry.connection(&conn("ghost")).is_none());
    }

    #[test]
    fn test_join_is_idempotent() {
        // テスト項目: 同じ Room への 2 回目の join は重複メンバーを作らない
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());

        // when (操作):
        let outcome = registry.join(&room("42"), &conn("alice"), ts());

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::AlreadyMember);
        assert_eq!(registry.room(&room("42")).unwrap().members.len(), 1);
    }

    #[test]
    fn test_join_other_room_moves_membership() {
        // テスト項目: 別の Room への join は所属の移動になる
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());
        registry.join(&room("42"), &conn("bob"), ts());

        // when (操作):
        let outcome = registry.join(&room("7"), &conn("alice"), ts());

        // then (期待する結果):
        assert_eq!(
            outcome,
            JoinOutcome::Joined {
                previous: Some(room("42"))
            }
        );
        assert_eq!(registry.room_of(&conn("alice")), Some(&room("7")));
        assert!(registry.members_except(&room("42"), &conn("bob")).is_empty());
        assert_eq!(
            registry.members_except(&room("7"), &conn("bob")),
            vec![conn("alice")]
        );
    }

    #[test]
    fn test_moving_last_member_removes_old_room() {
        // テスト項目: 最後のメンバーが移動すると元の Room は削除される
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());

        // when (操作):
        registry.join(&room("7"), &conn("alice"), ts());

        // then (期待する結果):
        assert!(registry.room(&room("42")).is_none());
        assert_eq!(registry.room_count(), 1);
    }

    #[test]
    fn test_leave_removes_empty_room() {
        // テスト項目: 最後のメンバーが抜けると Room のエントリが削除される
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());

        // when (操作):
        let changed = registry.leave(&room("42"), &conn("alice"));

        // then (期待する結果):
        assert!(changed);
        assert!(registry.room(&room("42")).is_none());
        assert_eq!(registry.room_of(&conn("alice")), None);
    }

    #[test]
    fn test_leave_non_member_is_noop() {
        // テスト項目: メンバーでない接続の leave は何もしない
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());

        // when (操作):
        let changed_unknown_room = registry.leave(&room("7"), &conn("alice"));
        let changed_non_member = registry.leave(&room("42"), &conn("bob"));

        // then (期待する結果):
        assert!(!changed_unknown_room);
        assert!(!changed_non_member);
        assert_eq!(registry.room_of(&conn("alice")), Some(&room("42")));
    }

    #[test]
    fn test_members_except_excludes_sender() {
        // テスト項目: members_except は除外対象以外のメンバーを返す
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());
        registry.join(&room("42"), &conn("bob"), ts());
        registry.join(&room("42"), &conn("charlie"), ts());

        // when (操作):
        let mut members = registry.members_except(&room("42"), &conn("alice"));
        members.sort();

        // then (期待する結果):
        assert_eq!(members, vec![conn("bob"), conn("charlie")]);
    }

    #[test]
    fn test_members_except_unknown_room_is_empty() {
        // テスト項目: 存在しない Room への問い合わせは空集合を返す
        // given (前提条件):
        let registry = RoomRegistry::new();

        // when (操作):
        let members = registry.members_except(&room("nowhere"), &conn("alice"));

        // then (期待する結果):
        assert!(members.is_empty());
    }

    #[test]
    fn test_remove_connection_clears_membership() {
        // テスト項目: 切断した接続はどの Room のメンバーにも残らない
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob"]);
        registry.join(&room("42"), &conn("alice"), ts());
        registry.join(&room("7"), &conn("alice"), ts());
        registry.join(&room("7"), &conn("bob"), ts());

        // when (操作):
        let left = registry.remove_connection(&conn("alice"));

        // then (期待する結果):
        assert_eq!(left, Some(room("7")));
        assert_eq!(registry.room_of(&conn("alice")), None);
        assert!(registry.connection(&conn("alice")).is_none());
        for room in registry.rooms() {
            assert!(!room.members.contains(&conn("alice")));
        }
    }

    #[test]
    fn test_remove_connection_is_idempotent() {
        // テスト項目: 同じ接続の削除を繰り返しても安全
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.join(&room("42"), &conn("alice"), ts());

        // when (操作):
        let first = registry.remove_connection(&conn("alice"));
        let second = registry.remove_connection(&conn("alice"));

        // then (期待する結果):
        assert_eq!(first, Some(room("42")));
        assert_eq!(second, None);
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_register_rejects_duplicate() {
        // テスト項目: 同じ ID の二重登録は拒否される
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        assert!(registry.register(conn("alice"), ts()));

        // when (操作):
        let registered_again = registry.register(conn("alice"), Timestamp::new(2_000));

        // then (期待する結果):
        assert!(!registered_again);
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(
            registry.connection(&conn("alice")).unwrap().connected_at,
            ts()
        );
    }

    #[test]
    fn test_membership_follows_latest_join() {
        // テスト項目: 一連の join/leave の後、メンバーシップは最後の join にのみ従う
        // given (前提条件):
        let mut registry = registry_with(&["a", "b", "c"]);
        let observer = conn("observer");
        let ops: Vec<(&str, Option<&str>)> = vec![
            ("a", Some("1")),
            ("b", Some("1")),
            ("a", Some("2")),
            ("c", Some("2")),
            ("b", None),
            ("c", Some("1")),
            ("a", Some("1")),
            ("c", None),
        ];

        // when (操作):
        let mut expected: HashMap<&str, &str> = HashMap::new();
        for (who, target) in ops {
            match target {
                Some(target) => {
                    registry.join(&room(target), &conn(who), ts());
                    expected.insert(who, target);
                }
                None => {
                    if let Some(current) = expected.remove(who) {
                        registry.leave(&room(current), &conn(who));
                    }
                }
            }
        }

        // then (期待する結果):
        for room_name in ["1", "2"] {
            let mut actual = registry.members_except(&room(room_name), &observer);
            actual.sort();
            let mut wanted: Vec<ConnectionId> = expected
                .iter()
                .filter(|(_, r)| **r == room_name)
                .map(|(who, _)| conn(who))
                .collect();
            wanted.sort();
            assert_eq!(actual, wanted, "room {room_name}");
        }
        assert!(registry.room(&room("2")).is_none());
    }
}

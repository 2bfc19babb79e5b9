//! Value Objects
//!
//! 不変で、値そのものが同一性を表すドメインの型。
//! 生成時にバリデーションを行い、不正な値が後続の層に流れないようにする。

use std::fmt;

use uuid::Uuid;

use super::error::DomainError;

/// Room ID の最大文字数
pub const MAX_ROOM_ID_CHARS: usize = 128;

/// Connection ID
///
/// 1 本の WebSocket 接続を識別する。プロセスの生存期間中は一意。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 任意の文字列から ConnectionId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ConnectionId の採番
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 で新しい ConnectionId を生成
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// Room ID
///
/// クライアントが指定する不透明な文字列。名前空間の検証は行わず、
/// 空文字列と長すぎる値だけを拒否する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        let chars = value.chars().count();
        if chars > MAX_ROOM_ID_CHARS {
            return Err(DomainError::RoomIdTooLong {
                len: chars,
                max: MAX_ROOM_ID_CHARS,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Audio Clip
///
/// 送信者が録音した音声。リレーは中身を解釈せず、1 つの単位として転送する。
/// 元のブラウザクライアントは `data:audio/webm;base64,...` 形式の文字列を送る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip(String);

impl AudioClip {
    /// サイズ上限 `max_bytes` を検証して AudioClip を作成
    pub fn new(data: String, max_bytes: usize) -> Result<Self, DomainError> {
        if data.is_empty() {
            return Err(DomainError::EmptyAudio);
        }
        if data.len() > max_bytes {
            return Err(DomainError::AudioTooLarge {
                size: data.len(),
                max: max_bytes,
            });
        }
        Ok(Self(data))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unix timestamp (milliseconds, UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_rejects_blank() {
        // テスト項目: 空白のみの ConnectionId は作成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = ConnectionId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::EmptyConnectionId));
    }

    #[test]
    fn test_connection_id_factory_generates_unique_ids() {
        // テスト項目: 採番された ConnectionId は互いに異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionIdFactory::generate();
        let b = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_room_id_accepts_opaque_string() {
        // テスト項目: 任意の文字列をそのまま Room ID として扱う
        // given (前提条件):
        let value = "42".to_string();

        // when (操作):
        let room_id = RoomId::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "42");
    }

    #[test]
    fn test_room_id_rejects_empty() {
        // テスト項目: 空の Room ID は拒否される
        // given (前提条件):
        let value = "".to_string();

        // when (操作):
        let result = RoomId::try_from(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::EmptyRoomId));
    }

    #[test]
    fn test_room_id_rejects_too_long() {
        // テスト項目: 上限を超える長さの Room ID は拒否される
        // given (前提条件):
        let value = "r".repeat(MAX_ROOM_ID_CHARS + 1);

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DomainError::RoomIdTooLong {
                len: MAX_ROOM_ID_CHARS + 1,
                max: MAX_ROOM_ID_CHARS,
            })
        );
    }

    #[test]
    fn test_audio_clip_within_limit() {
        // テスト項目: 上限ちょうどのサイズの音声は受け付けられる
        // given (前提条件):
        let data = "a".repeat(16);

        // when (操作):
        let clip = AudioClip::new(data, 16).unwrap();

        // then (期待する結果):
        assert_eq!(clip.len(), 16);
    }

    #[test]
    fn test_audio_clip_rejects_oversized_payload() {
        // テスト項目: 上限を超える音声は拒否される
        // given (前提条件):
        let data = "a".repeat(17);

        // when (操作):
        let result = AudioClip::new(data, 16);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::AudioTooLarge { size: 17, max: 16 }));
    }

    #[test]
    fn test_audio_clip_rejects_empty_payload() {
        // テスト項目: 空の音声は拒否される
        // given (前提条件):

        // when (操作):
        let result = AudioClip::new(String::new(), 16);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::EmptyAudio));
    }
}

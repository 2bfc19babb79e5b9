//! UseCase: Room 一覧・詳細の取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomError;

/// Room 情報取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在する Room の一覧（ID 順）
    pub async fn list(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }

    /// 指定した Room の詳細
    pub async fn detail(&self, room_id: &RoomId) -> Result<Room, GetRoomError> {
        self.repository
            .get_room(room_id)
            .await
            .ok_or(GetRoomError::RoomNotFound)
    }

    /// 現在の接続数
    pub async fn count_connections(&self) -> usize {
        self.repository.count_connections().await
    }
}

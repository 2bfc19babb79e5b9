//! Conversion logic between domain entities and DTOs.

use walkie_shared::time::timestamp_to_rfc3339;

use crate::domain::entity::Room;
use crate::infrastructure::dto::http as dto;

impl From<&Room> for dto::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            member_count: room.members.len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for dto::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room
                .sorted_members()
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

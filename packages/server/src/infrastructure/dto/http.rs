//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusDto {
    pub status: String,
    pub message: String,
    pub connections: usize,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
    pub timestamp: String,
}

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
    pub created_at: String,
}

/// `GET /api/rooms/{room_id}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<String>,
    pub created_at: String,
}

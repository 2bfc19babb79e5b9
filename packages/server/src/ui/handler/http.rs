//! HTTP API endpoint handlers.
//!
//! All endpoints are read-only views of the room registry.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use walkie_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{HealthDto, RoomDetailDto, RoomSummaryDto, StatusDto},
    ui::state::AppState,
};

/// `GET /`
pub async fn server_status(State(state): State<Arc<AppState>>) -> Json<StatusDto> {
    Json(StatusDto {
        status: "running".to_string(),
        message: "Walkie-talkie relay".to_string(),
        connections: state.get_rooms_usecase.count_connections().await,
    })
}

/// `GET /health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.get_rooms_usecase.count_connections().await,
        timestamp: timestamp_to_rfc3339(state.clock.now_millis()),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.list().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    // 不正な Room ID の Room は存在し得ないので 404 として扱う
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .get_rooms_usecase
        .detail(&room_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(RoomDetailDto::from(&room)))
}

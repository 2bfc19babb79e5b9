//! Server state shared by all handlers.

use std::sync::Arc;

use walkie_shared::time::Clock;

use crate::{config::RelayConfig, usecase::GetRoomsUseCase};

use super::dispatcher::RelayDispatcher;

/// Shared application state
pub struct AppState {
    /// WebSocket イベントの振り分け
    pub dispatcher: Arc<RelayDispatcher>,
    /// HTTP API 向けの読み取り専用ユースケース
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub clock: Arc<dyn Clock>,
    pub config: RelayConfig,
}

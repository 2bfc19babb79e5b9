//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use walkie_shared::time::Clock;

use crate::{
    config::RelayConfig,
    domain::{MessagePusher, RoomRepository},
    usecase::GetRoomsUseCase,
};

use super::{
    dispatcher::RelayDispatcher,
    handler::{get_room_detail, get_rooms, health_check, server_status, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Walkie-talkie relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(repository, message_pusher, Arc::new(SystemClock), config);
/// server.run("127.0.0.1", 3001).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: RelayConfig,
    ) -> Self {
        let dispatcher = Arc::new(RelayDispatcher::new(
            repository.clone(),
            message_pusher,
            clock.clone(),
            &config,
        ));
        let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository));

        Self {
            state: Arc::new(AppState {
                dispatcher,
                get_rooms_usecase,
                clock,
                config,
            }),
        }
    }

    /// Build the router with all routes and layers
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(server_status))
            .route("/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind to `host:port` and serve until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self, host: &str, port: u16) -> std::io::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        tracing::info!("Connect to: ws://{}/ws", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        tracing::info!(
            "Walkie-talkie relay listening on {} (room policy: {:?})",
            listener.local_addr()?,
            self.state.config.room_policy
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

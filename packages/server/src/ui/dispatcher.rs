//! Relay dispatcher.
//!
//! Turns inbound text frames into calls on the usecases, and usecase results
//! into outbound [`ServerEvent`]s. Every outbound event is serialized once and
//! shared by all its recipients.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayDispatcher の connect / dispatch / disconnect
//! - 実際の InMemoryRoomRepository と WebSocketMessagePusher を使い、各接続の送信キューに届いたフレームを検証
//!
//! ### どのような状況を想定しているか
//! - 正常系：join・音声転送・leave・切断の一連の流れ
//! - 異常系：壊れた JSON、空の Room ID、サイズ超過の音声、別の Room 宛ての音声
//! - エッジケース：同じ Room への再 join、Room の移動、所属していない Room からの leave

use std::sync::Arc;

use thiserror::Error;
use walkie_shared::time::{Clock, timestamp_to_rfc3339};

use crate::{
    config::RelayConfig,
    domain::{
        AudioClip, ConnectionId, DomainError, MessagePusher, PusherChannel, RoomId,
        RoomRepository, Timestamp,
    },
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    usecase::{
        ConnectError, ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinRoomError,
        JoinRoomUseCase, LeaveRoomError, LeaveRoomUseCase, RelayAudioError, RelayAudioUseCase,
    },
};

/// Why an inbound frame had no effect
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Not JSON, or not a known event shape
    #[error("malformed event: {0}")]
    Malformed(#[source] serde_json::Error),
    /// Well-formed event carrying an unusable value
    #[error("invalid event: {0}")]
    Invalid(#[from] DomainError),
    /// Audio refused by the room policy
    #[error("audio rejected: {0}")]
    Rejected(#[from] RelayAudioError),
    #[error("failed to encode outbound event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Routes events between connections
pub struct RelayDispatcher {
    connect_participant_usecase: ConnectParticipantUseCase,
    join_room_usecase: JoinRoomUseCase,
    leave_room_usecase: LeaveRoomUseCase,
    relay_audio_usecase: RelayAudioUseCase,
    disconnect_participant_usecase: DisconnectParticipantUseCase,
    clock: Arc<dyn Clock>,
    max_audio_bytes: usize,
}

impl RelayDispatcher {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: &RelayConfig,
    ) -> Self {
        Self {
            connect_participant_usecase: ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            join_room_usecase: JoinRoomUseCase::new(repository.clone(), message_pusher.clone()),
            leave_room_usecase: LeaveRoomUseCase::new(repository.clone(), message_pusher.clone()),
            relay_audio_usecase: RelayAudioUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                config.room_policy,
            ),
            disconnect_participant_usecase: DisconnectParticipantUseCase::new(
                repository,
                message_pusher,
            ),
            clock,
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    fn now(&self) -> (Timestamp, String) {
        let millis = self.clock.now_millis();
        (Timestamp::new(millis), timestamp_to_rfc3339(millis))
    }

    /// Register a freshly accepted connection and greet it with its identifier.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        let (now, timestamp) = self.now();
        self.connect_participant_usecase
            .execute(connection_id.clone(), sender, now)
            .await?;

        let greeting = ServerEvent::Connected {
            user_id: connection_id.to_string(),
            timestamp,
        };
        match greeting.to_frame() {
            Ok(frame) => {
                if let Err(e) = self
                    .connect_participant_usecase
                    .greet(&connection_id, frame)
                    .await
                {
                    tracing::warn!("Failed to greet '{}': {}", connection_id, e);
                }
            }
            Err(e) => tracing::error!("Failed to encode greeting: {}", e),
        }

        tracing::info!("'{}' connected", connection_id);
        Ok(())
    }

    /// Handle one inbound text frame.
    pub async fn dispatch(
        &self,
        connection_id: &ConnectionId,
        text: &str,
    ) -> Result<(), DispatchError> {
        let event: ClientEvent = serde_json::from_str(text).map_err(DispatchError::Malformed)?;
        self.handle_event(connection_id, event).await
    }

    pub async fn handle_event(
        &self,
        connection_id: &ConnectionId,
        event: ClientEvent,
    ) -> Result<(), DispatchError> {
        match event {
            ClientEvent::JoinRoom { room_id } => {
                self.join(connection_id, RoomId::new(room_id)?).await
            }
            ClientEvent::LeaveRoom { room_id } => {
                self.leave(connection_id, RoomId::new(room_id)?).await
            }
            ClientEvent::AudioMessage { room_id, audio } => {
                let room_id = RoomId::new(room_id)?;
                let clip = AudioClip::new(audio, self.max_audio_bytes)?;
                self.relay(connection_id, room_id, clip).await
            }
        }
    }

    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(), DispatchError> {
        let (now, timestamp) = self.now();
        let output = match self
            .join_room_usecase
            .execute(&room_id, connection_id, now)
            .await
        {
            Ok(output) => output,
            Err(JoinRoomError::NotRegistered(id)) => {
                tracing::warn!("Ignoring join of '{}' to room '{}': not registered", id, room_id);
                return Ok(());
            }
        };

        if let Some((previous_room, remaining)) = output.previous {
            let left = ServerEvent::UserLeft {
                user_id: connection_id.to_string(),
                room_id: previous_room.to_string(),
                timestamp: timestamp.clone(),
            };
            self.join_room_usecase
                .notify(remaining, left.to_frame()?)
                .await;
        }

        let mut members: Vec<String> = output.peers.iter().map(|id| id.to_string()).collect();
        members.push(connection_id.to_string());
        members.sort();
        let joined = ServerEvent::RoomJoined {
            room_id: room_id.to_string(),
            members,
            timestamp: timestamp.clone(),
        };
        if let Err(e) = self
            .join_room_usecase
            .reply(connection_id, joined.to_frame()?)
            .await
        {
            tracing::warn!("Failed to confirm join to '{}': {}", connection_id, e);
        }

        if !output.already_member {
            let notice = ServerEvent::UserJoined {
                user_id: connection_id.to_string(),
                room_id: room_id.to_string(),
                timestamp,
            };
            self.join_room_usecase
                .notify(output.peers, notice.to_frame()?)
                .await;
        }

        Ok(())
    }

    async fn leave(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(), DispatchError> {
        let remaining = match self
            .leave_room_usecase
            .execute(&room_id, connection_id)
            .await
        {
            Ok(remaining) => remaining,
            Err(LeaveRoomError::NotInRoom(room)) => {
                tracing::debug!("Ignoring leave of '{}' from room '{}'", connection_id, room);
                return Ok(());
            }
        };

        let timestamp = self.now().1;
        let confirmation = ServerEvent::RoomLeft {
            room_id: room_id.to_string(),
            timestamp: timestamp.clone(),
        };
        if let Err(e) = self
            .leave_room_usecase
            .reply(connection_id, confirmation.to_frame()?)
            .await
        {
            tracing::warn!("Failed to confirm leave to '{}': {}", connection_id, e);
        }

        let notice = ServerEvent::UserLeft {
            user_id: connection_id.to_string(),
            room_id: room_id.to_string(),
            timestamp,
        };
        self.leave_room_usecase
            .notify(remaining, notice.to_frame()?)
            .await;

        Ok(())
    }

    async fn relay(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        clip: AudioClip,
    ) -> Result<(), DispatchError> {
        let size = clip.len();
        let event = ServerEvent::AudioMessage {
            audio: clip.into_string(),
            sender_id: connection_id.to_string(),
            room_id: room_id.to_string(),
            timestamp: self.now().1,
        };

        let report = self
            .relay_audio_usecase
            .execute(connection_id, &room_id, move || {
                event.to_frame().map_err(DispatchError::from)
            })
            .await?;
        if report.delivered < report.targets.len() {
            tracing::warn!(
                "Audio from '{}' ({} bytes) reached {}/{} members of room '{}'",
                connection_id,
                size,
                report.delivered,
                report.targets.len(),
                room_id
            );
        }

        Ok(())
    }

    /// Tear down a connection. Safe to call more than once.
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        let Some((room_id, remaining)) = self
            .disconnect_participant_usecase
            .execute(connection_id)
            .await
        else {
            tracing::info!("'{}' disconnected", connection_id);
            return;
        };

        let notice = ServerEvent::UserLeft {
            user_id: connection_id.to_string(),
            room_id: room_id.to_string(),
            timestamp: self.now().1,
        };
        match notice.to_frame() {
            Ok(frame) => {
                self.disconnect_participant_usecase
                    .notify(remaining, frame)
                    .await;
            }
            Err(e) => tracing::error!("Failed to encode user-left: {}", e),
        }
    }
}

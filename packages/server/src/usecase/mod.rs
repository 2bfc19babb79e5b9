//! UseCase 層
//!
//! UI 層（WebSocket ハンドラ・ディスパッチャ）から呼ばれるアプリケーションロジック。
//! ワイヤフォーマットは知らず、Domain Model と送信済みのメッセージ（`Arc<str>`）だけを扱う。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod relay_audio;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, GetRoomError, JoinRoomError, LeaveRoomError, RelayAudioError};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRoomOutput, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use relay_audio::{RelayAudioUseCase, RelayReport};

//! Client session against an in-process relay.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use walkie_client::{ClientState, clip, session::run_client_session};
use walkie_server::{
    config::RelayConfig,
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::Server,
};
use walkie_shared::time::SystemClock;

async fn start_relay() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = Server::new(
        Arc::new(InMemoryRoomRepository::new()),
        Arc::new(WebSocketMessagePusher::new()),
        Arc::new(SystemClock),
        RelayConfig::default(),
    );
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    port
}

async fn wait_for_file(dir: &Path) -> Option<PathBuf> {
    for _ in 0..40 {
        if let Ok(mut entries) = tokio::fs::read_dir(dir).await
            && let Ok(Some(entry)) = entries.next_entry().await
        {
            return Some(entry.path());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    None
}

#[tokio::test]
async fn test_session_joins_room_and_saves_incoming_clip() {
    // テスト項目: 指定した Room に自動で参加し、他のメンバーの音声をファイルに保存する
    // given (前提条件):
    let port = start_relay().await;
    let url = format!("ws://127.0.0.1:{}/ws", port);
    let save_dir = std::env::temp_dir().join(format!("walkie-client-it-{}", std::process::id()));

    let (mut peer, _) = connect_async(&url).await.unwrap();
    peer.send(Message::text(r#"{"type":"join-room","roomId":"42"}"#))
        .await
        .unwrap();

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let state = Arc::new(Mutex::new(ClientState::new(Some("42".to_string()))));
    let session_state = state.clone();
    let session_dir = save_dir.clone();
    let session = tokio::spawn(async move {
        run_client_session(&url, &mut input_rx, &session_state, Some(&session_dir)).await
    });

    // peer waits until the client has joined
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), peer.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg
            && let Ok(ServerEvent::UserJoined { .. }) = serde_json::from_str::<ServerEvent>(text.as_str())
        {
            break;
        }
    }

    // when (操作):
    let audio = clip::encode("audio/webm", b"\x1a\x45\xdf\xa3");
    peer.send(Message::text(format!(
        r#"{{"type":"audio-message","roomId":"42","audio":"{audio}"}}"#
    )))
    .await
    .unwrap();
    let saved = wait_for_file(&save_dir).await;
    drop(input_tx);
    let result = tokio::time::timeout(Duration::from_secs(2), session)
        .await
        .unwrap()
        .unwrap();

    // then (期待する結果):
    let saved = saved.expect("clip was not saved");
    assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"\x1a\x45\xdf\xa3");
    assert!(result.is_ok());
    assert_eq!(state.lock().unwrap().room.as_deref(), Some("42"));
    tokio::fs::remove_dir_all(&save_dir).await.ok();
}

#[tokio::test]
async fn test_session_reports_unreachable_relay() {
    // テスト項目: 接続できないリレーには ConnectionError が返される
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let (_input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let state = Arc::new(Mutex::new(ClientState::default()));

    // when (操作):
    let result = run_client_session(
        &format!("ws://127.0.0.1:{}/ws", port),
        &mut input_rx,
        &state,
        None,
    )
    .await;

    // then (期待する結果):
    assert!(matches!(
        result,
        Err(walkie_client::ClientError::ConnectionError(_))
    ));
}

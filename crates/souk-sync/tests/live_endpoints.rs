use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use souk_proto::{ChatMessageWire, OutgoingChat};
use souk_sync::rest::{FeedApi, HttpFeedApi};
use souk_sync::transport::{PushTransport, WebSocketConfig, WebSocketPushTransport};
use souk_sync::{FeedConfig, FeedController};

#[derive(Clone)]
struct AppState {
    chat: Arc<Mutex<Vec<ChatMessageWire>>>,
    /// Frames pushed to every WebSocket client right after the handshake.
    frames: Arc<Mutex<Vec<String>>>,
}

impl AppState {
    fn new(chat: Vec<ChatMessageWire>, frames: Vec<String>) -> Self {
        Self {
            chat: Arc::new(Mutex::new(chat)),
            frames: Arc::new(Mutex::new(frames)),
        }
    }
}

async fn list_chat(State(state): State<AppState>) -> Json<Vec<ChatMessageWire>> {
    Json(state.chat.lock().unwrap().clone())
}

async fn accept_chat(
    State(state): State<AppState>,
    Json(body): Json<OutgoingChat>,
) -> StatusCode {
    let mut chat = state.chat.lock().unwrap();
    let id = format!("m{}", chat.len() + 1);
    chat.push(ChatMessageWire {
        id: Some(id),
        username: body.username,
        message: body.message,
        timestamp: Some(0),
        emoji: body.emoji,
    });
    StatusCode::NO_CONTENT
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| push_frames(socket, state))
}

async fn push_frames(mut socket: WebSocket, state: AppState) {
    let frames = state.frames.lock().unwrap().clone();
    for frame in frames {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }
    // Keep the connection open until the client goes away.
    while socket.recv().await.is_some() {}
}

async fn spawn_app(state: AppState) -> SocketAddr {
    let app = Router::new()
        .route("/chat", get(list_chat).post(accept_chat))
        .route("/ws", get(ws_upgrade))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

fn chat_envelope(id: &str, username: &str, message: &str) -> String {
    json!({
        "type": "chat_message",
        "data": {"id": id, "username": username, "message": message, "timestamp": 100},
    })
    .to_string()
}

#[tokio::test]
async fn http_feed_api_round_trips_chat() {
    let _ = souk_sync::telemetry::init();
    let state = AppState::new(
        vec![ChatMessageWire {
            id: Some("m1".to_string()),
            username: "store".to_string(),
            message: "welcome".to_string(),
            timestamp: Some(1),
            emoji: None,
        }],
        Vec::new(),
    );
    let addr = spawn_app(state.clone()).await;

    let api = HttpFeedApi::new(format!("http://{addr}"));
    let list = api.fetch_chat().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].username, "store");

    api.post_chat(&OutgoingChat::new("amira", "hello"))
        .await
        .unwrap();
    let list = api.fetch_chat().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].username, "amira");
}

#[tokio::test]
async fn websocket_transport_delivers_text_frames_in_order() {
    let state = AppState::new(
        Vec::new(),
        vec![
            chat_envelope("m1", "amira", "first"),
            chat_envelope("m2", "basim", "second"),
        ],
    );
    let addr = spawn_app(state).await;

    let transport = WebSocketPushTransport::new(WebSocketConfig::new(format!("ws://{addr}/ws")));
    let mut connection = transport.connect().await.unwrap();

    let first = connection.recv().await.unwrap();
    assert!(first.contains("\"m1\""));
    let second = connection.recv().await.unwrap();
    assert!(second.contains("\"m2\""));

    connection.close().await;
}

#[tokio::test]
async fn controller_syncs_over_real_endpoints() {
    let state = AppState::new(
        vec![ChatMessageWire {
            id: Some("m0".to_string()),
            username: "store".to_string(),
            message: "welcome".to_string(),
            timestamp: Some(1),
            emoji: None,
        }],
        vec![chat_envelope("m1", "amira", "hi")],
    );
    let addr = spawn_app(state.clone()).await;

    let config = FeedConfig {
        http_base: format!("http://{addr}"),
        ws_url: format!("ws://{addr}/ws"),
        poll_interval: Duration::from_millis(100),
    };
    let controller = FeedController::connect(config);

    let feed = controller.state();
    wait_until("pushed chat line", || {
        feed.events().iter().any(|event| event.id.as_deref() == Some("m1"))
    })
    .await;

    controller
        .send(OutgoingChat::new("amira", "hello"))
        .await
        .unwrap();
    wait_until("recorded send", || state.chat.lock().unwrap().len() == 2).await;

    controller.shutdown();
}

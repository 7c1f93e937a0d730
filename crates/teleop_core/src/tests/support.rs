//! In-process rosbridge stand-in for transport tests.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::mpsc};

pub const STAND_IN_POSE: (f64, f64, f64) = (1.5, 2.0, std::f64::consts::FRAC_PI_2);

#[derive(Clone)]
struct BridgeState {
    received: mpsc::UnboundedSender<Value>,
}

/// Starts a stand-in bridge on a random local port.
///
/// Every text frame received is forwarded to the returned channel. Each
/// `subscribe` is answered with a status frame, a malformed frame and one
/// pose sample on the subscribed topic.
pub async fn spawn_bridge() -> (String, mpsc::UnboundedReceiver<Value>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (received, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/", get(ws_handler))
        .with_state(BridgeState { received });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("ws://{addr}"), rx)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<BridgeState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| bridge_socket(state, socket))
}

async fn bridge_socket(state: BridgeState, mut socket: WebSocket) {
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let Ok(frame) = serde_json::from_str::<Value>(&text) else {
                    continue;
                };
                let _ = state.received.send(frame.clone());
                if frame["op"] == "subscribe" {
                    let (x, y, theta) = STAND_IN_POSE;
                    let replies = [
                        json!({ "op": "status", "level": "info", "msg": "subscribed" })
                            .to_string(),
                        "{not json".to_string(),
                        json!({
                            "op": "publish",
                            "topic": frame["topic"],
                            "msg": { "x": x, "y": y, "theta": theta }
                        })
                        .to_string(),
                    ];
                    for reply in replies {
                        if socket.send(Message::Text(reply)).await.is_err() {
                            return;
                        }
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

pub async fn next_frame(rx: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("frame within timeout")
        .expect("bridge channel open")
}

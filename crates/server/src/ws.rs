//! Streaming scores over WebSocket.
//!
//! Every text frame is one message: a single number appended to the
//! connection's rolling buffer, or a CSV table scored on its own. Each
//! message gets exactly one JSON reply; failures are reported in-band and
//! the connection stays open.

use anomaly::StreamMonitor;
use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::routes::AuthQuery;
use crate::state::AppState;

/// Reply sent for any message that cannot be scored.
pub const PARSE_ERROR_REPLY: &str = "could not parse message";

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(auth): Query<AuthQuery>,
    State(state): State<AppState>,
) -> Response {
    let authorized = match &state.config.api_key {
        Some(expected) => auth.api_key.as_deref() == Some(expected.as_str()),
        None => true,
    };
    if !authorized {
        return ws.on_upgrade(reject);
    }
    ws.on_upgrade(move |socket| stream_session(socket, state))
}

async fn reject(mut socket: WebSocket) {
    debug!("closing websocket with invalid api key");
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: close_code::POLICY,
            reason: "invalid api key".into(),
        })))
        .await;
}

async fn stream_session(mut socket: WebSocket, state: AppState) {
    let mut monitor = StreamMonitor::new(state.scorer.clone(), state.config.stream_window);
    info!("websocket session opened");

    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "websocket receive failed");
                break;
            }
        };

        let scored = tokio::task::spawn_blocking(move || {
            let reply = reply_for(&mut monitor, &text);
            (monitor, reply)
        })
        .await;
        let reply = match scored {
            Ok((returned, reply)) => {
                monitor = returned;
                reply
            }
            Err(e) => {
                debug!(error = %e, "websocket scoring task failed");
                break;
            }
        };

        if socket.send(Message::Text(reply.to_string())).await.is_err() {
            break;
        }
    }
    info!("websocket session closed");
}

/// Score one message and build its JSON reply.
pub fn reply_for(monitor: &mut StreamMonitor, text: &str) -> Value {
    match monitor.handle_text(text) {
        Ok(update) => serde_json::to_value(&update)
            .unwrap_or_else(|_| json!({ "error": PARSE_ERROR_REPLY })),
        Err(e) => {
            debug!(error = %e, "stream message rejected");
            json!({ "error": PARSE_ERROR_REPLY })
        }
    }
}

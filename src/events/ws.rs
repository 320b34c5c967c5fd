//! WebSocket fan-out endpoint — clients join one or more rooms and
//! receive the events published to them (spec §4.7, §6.2).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::state::AppState;

use super::{Event, EventBus};

/// Client -> server control message. Clients join rooms explicitly
/// rather than receiving everything, so a kiosk display only pays for
/// `kiosk` while an admin console can join `admin-<office>` and its own
/// `session-<token>` room for force-logout.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
enum ClientMessage {
    JoinRoom { room: String },
    LeaveRoom { room: String },
}

const OUTBOX_CAPACITY: usize = 256;

pub async fn ws_handler(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let bus = state.events.clone();
    ws.on_upgrade(move |socket| handle_connection(bus, socket))
}

async fn handle_connection(bus: Arc<EventBus>, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<Event>(OUTBOX_CAPACITY);

    // One forwarder task per joined room; each owns its own broadcast
    // receiver, so joining/leaving never needs a borrow shared with the
    // select loop below.
    let mut forwarders: HashMap<String, JoinHandle<()>> = HashMap::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&bus, &outbox_tx, &mut forwarders, &text);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
            event = outbox_rx.recv() => {
                let Some(event) = event else { break };
                if let Ok(json) = serde_json::to_string(&event) {
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    for handle in forwarders.into_values() {
        handle.abort();
    }
}

fn handle_client_message(
    bus: &Arc<EventBus>,
    outbox_tx: &mpsc::Sender<Event>,
    forwarders: &mut HashMap<String, JoinHandle<()>>,
    text: &str,
) {
    let Ok(msg) = serde_json::from_str::<ClientMessage>(text) else {
        return;
    };

    match msg {
        ClientMessage::JoinRoom { room } => {
            if forwarders.contains_key(&room) {
                return;
            }
            let rx = bus.subscribe(&room);
            let outbox_tx = outbox_tx.clone();
            let handle = tokio::spawn(forward_room(rx, outbox_tx));
            forwarders.insert(room, handle);
        }
        ClientMessage::LeaveRoom { room } => {
            if let Some(handle) = forwarders.remove(&room) {
                handle.abort();
            }
        }
    }
}

/// Pump one room's broadcast receiver into the connection's outbox,
/// skipping lag gaps and stopping once the room or the connection closes.
async fn forward_room(mut rx: broadcast::Receiver<Event>, outbox_tx: mpsc::Sender<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if outbox_tx.send(event).await.is_err() {
                    return;
                }
            }
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

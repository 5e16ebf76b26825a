use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::common::{SocketId, now_ms};
use crate::monitoring::collect_stats;
use crate::protocol::{IncomingMessage, OutgoingMessage};
use crate::radio::{ChatAuthor, ListenerCategory};
use crate::server::{AppState, WsSession};

/// GET /v1/websocket
///
/// Push interface: subscribers receive chat, presence, and position events as
/// they happen instead of polling the REST surface.
pub async fn websocket_handler(
    headers: HeaderMap,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<Response, (StatusCode, &'static str)> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());

    match auth_header {
        Some(auth) if auth == state.config.server.password => {}
        Some(_) => {
            warn!("websocket authorization failed: invalid password");
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
        }
        None => {
            warn!("websocket authorization failed: missing Authorization header");
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
        }
    }

    if let Some(name) = headers.get("client-name").and_then(|h| h.to_str().ok()) {
        info!("incoming websocket connection from client: {}", name);
    }

    let mut response = ws
        .on_upgrade(move |socket| handle_socket(socket, state))
        .into_response();
    response
        .headers_mut()
        .insert("Moltradio-Api-Version", "1".parse().unwrap());
    Ok(response)
}

pub async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = flume::unbounded();
    let session = Arc::new(WsSession {
        socket_id: SocketId::generate(),
        listener_id: parking_lot::Mutex::new(None),
        sender: tx,
    });
    state
        .sockets
        .insert(session.socket_id.clone(), session.clone());
    info!("websocket connected: socket={}", session.socket_id);

    // Ready carries enough to start rendering without a REST round trip.
    let ready = {
        let stream = state.stream.read();
        stream.position(now_ms()).ok().map(|sync| OutgoingMessage::Ready {
            stream_name: state.config.radio.stream_name.clone(),
            sync,
            current_song: stream.current_song.clone(),
        })
    };
    if let Some(ready) = ready {
        if let Ok(json) = serde_json::to_string(&ready) {
            let _ = socket.send(Message::Text(json.into())).await;
        }
    }

    let mut stats_interval = tokio::time::interval(std::time::Duration::from_secs(60));
    stats_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    stats_interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            _ = stats_interval.tick() => {
                let msg = OutgoingMessage::Stats(collect_stats(&state));
                if let Ok(json) = serde_json::to_string(&msg) {
                    if let Err(e) = socket.send(Message::Text(json.into())).await {
                        error!("socket send error (stats): socket={} err={}", session.socket_id, e);
                        break;
                    }
                }
            }
            Ok(msg) = rx.recv_async() => {
                if let Err(e) = socket.send(msg).await {
                    error!("socket send error: socket={} err={}", session.socket_id, e);
                    break;
                }
            }
            msg = socket.recv() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        warn!("websocket error: socket={} err={}", session.socket_id, e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<IncomingMessage>(&text) {
                        Ok(op) => handle_op(op, &state, &session),
                        Err(e) => session.send_message(&OutgoingMessage::Error {
                            message: format!("invalid op: {}", e),
                        }),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    // Cleanup: a socket that joined presence leaves it on disconnect.
    state.sockets.remove(&session.socket_id);
    let joined = session.listener_id.lock().take();
    if let Some(listener_id) = joined {
        if state.presence.leave(&listener_id).is_ok() {
            info!(
                "websocket disconnected, listener auto-left: socket={} listener={}",
                session.socket_id, listener_id
            );
            state.broadcast_listener_counts();
        }
    } else {
        info!("websocket disconnected: socket={}", session.socket_id);
    }
}

fn handle_op(op: IncomingMessage, state: &Arc<AppState>, session: &Arc<WsSession>) {
    match op {
        IncomingMessage::Join {
            category,
            display_name,
        } => {
            let category = match ListenerCategory::parse(&category) {
                Ok(c) => c,
                Err(err) => {
                    session.send_message(&OutgoingMessage::Error {
                        message: err.to_string(),
                    });
                    return;
                }
            };

            // A socket joining twice replaces its previous record.
            if let Some(previous) = session.listener_id.lock().take() {
                let _ = state.presence.leave(&previous);
            }

            let record = state.presence.join(category, display_name, now_ms());
            *session.listener_id.lock() = Some(record.id.clone());
            info!(
                "listener joined via websocket: socket={} listener={} category={}",
                session.socket_id, record.id, record.category
            );

            session.send_message(&OutgoingMessage::Joined {
                listener: record.into(),
            });
            state.broadcast_listener_counts();
        }
        IncomingMessage::Heartbeat { listener_id } => {
            match state.presence.heartbeat(&listener_id, now_ms()) {
                Ok(()) => session.send_message(&OutgoingMessage::HeartbeatAck { listener_id }),
                Err(err) => session.send_message(&OutgoingMessage::Error {
                    message: err.to_string(),
                }),
            }
        }
        IncomingMessage::Leave { listener_id } => match state.presence.leave(&listener_id) {
            Ok(record) => {
                let mut joined = session.listener_id.lock();
                if joined.as_ref() == Some(&record.id) {
                    *joined = None;
                }
                drop(joined);
                session.send_message(&OutgoingMessage::Left { listener_id: record.id });
                state.broadcast_listener_counts();
            }
            Err(err) => session.send_message(&OutgoingMessage::Error {
                message: err.to_string(),
            }),
        },
        IncomingMessage::Chat {
            author_name,
            author_type,
            content,
        } => {
            let joined = session.listener_id.lock().clone();
            let record = joined.and_then(|id| {
                state
                    .presence
                    .snapshot(now_ms())
                    .records
                    .into_iter()
                    .find(|r| r.id == id)
            });

            let author_type = match author_type {
                Some(raw) => match ChatAuthor::parse(&raw) {
                    Ok(a) => a,
                    Err(err) => {
                        session.send_message(&OutgoingMessage::Error {
                            message: err.to_string(),
                        });
                        return;
                    }
                },
                // Derive from the socket's presence record; anonymous
                // listeners chat as humans.
                None => match record.as_ref().map(|r| r.category) {
                    Some(ListenerCategory::Agent) => ChatAuthor::Agent,
                    _ => ChatAuthor::Human,
                },
            };

            let author_name = author_name
                .or_else(|| record.and_then(|r| r.display_name))
                .unwrap_or_else(|| "anonymous".to_string());

            match state.chat.append(author_name, author_type, &content, now_ms()) {
                Ok(message) => state.broadcast(&OutgoingMessage::Chat {
                    message: message.into(),
                }),
                Err(err) => session.send_message(&OutgoingMessage::Error {
                    message: err.to_string(),
                }),
            }
        }
    }
}

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use crate::common::{ListenerId, RadioError, SocketId, now_ms};
use crate::configs::Config;
use crate::protocol::OutgoingMessage;
use crate::radio::{ChatLog, PresenceTracker, StreamState};

/// One websocket subscriber. A socket may additionally hold a presence
/// record; when it does, disconnecting leaves presence automatically.
pub struct WsSession {
    pub socket_id: SocketId,
    /// Presence record this socket joined through, if any.
    pub listener_id: Mutex<Option<ListenerId>>,
    /// Sender for outgoing WS messages.
    pub sender: flume::Sender<Message>,
}

impl WsSession {
    pub fn send_message(&self, msg: &OutgoingMessage) {
        if let Ok(json) = serde_json::to_string(msg) {
            let _ = self.sender.send(Message::Text(json.into()));
        }
    }
}

/// Top-level application state: exactly one stream slot, one presence
/// tracker, and one chat log per node.
pub struct AppState {
    pub config: Config,
    pub stream: RwLock<StreamState>,
    pub presence: PresenceTracker,
    pub chat: ChatLog,
    pub sockets: DashMap<SocketId, Arc<WsSession>>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, RadioError> {
        config.validate()?;
        let stream = StreamState::new(config.radio.default_track_duration_secs, now_ms())?;
        Ok(Self {
            presence: PresenceTracker::new(config.radio.listener_timeout_ms()),
            chat: ChatLog::new(
                config.radio.chat_history_limit,
                config.radio.max_chat_message_length,
            ),
            stream: RwLock::new(stream),
            sockets: DashMap::new(),
            start_time: std::time::Instant::now(),
            config,
        })
    }

    /// Fans an event out to every connected websocket subscriber.
    pub fn broadcast(&self, msg: &OutgoingMessage) {
        if let Ok(json) = serde_json::to_string(msg) {
            for session in self.sockets.iter() {
                let _ = session.sender.send(Message::Text(json.clone().into()));
            }
        }
    }

    /// Pushes fresh aggregate counts to all subscribers.
    pub fn broadcast_listener_counts(&self) {
        let snapshot = self.presence.snapshot(now_ms());
        self.broadcast(&OutgoingMessage::ListenerUpdate {
            counts: (&snapshot).into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::RadioConfig;

    #[test]
    fn state_from_default_config() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(state.stream.read().track_duration_secs, 180);
        assert!(state.chat.is_empty());
        assert_eq!(state.sockets.len(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            radio: RadioConfig {
                heartbeat_interval_secs: 90,
                listener_timeout_secs: 60,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            AppState::new(config),
            Err(RadioError::InvalidConfiguration(_))
        ));
    }
}

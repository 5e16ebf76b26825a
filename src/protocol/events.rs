use serde::{Deserialize, Serialize};

use crate::common::ListenerId;
use crate::monitoring::PlatformStats;
use crate::protocol::models::{ChatMessageInfo, ListenerCounts, ListenerInfo};
use crate::radio::{NowPlaying, PlaybackPosition};

/// Actions a websocket client may send, tagged by `op`. These mirror the REST
/// operations so event-stream clients never have to poll.
#[derive(Deserialize, Debug)]
#[serde(tag = "op")]
#[serde(rename_all = "camelCase")]
pub enum IncomingMessage {
    #[serde(rename_all = "camelCase")]
    Join {
        category: String,
        #[serde(default)]
        display_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Heartbeat {
        listener_id: ListenerId,
    },
    #[serde(rename_all = "camelCase")]
    Leave {
        listener_id: ListenerId,
    },
    #[serde(rename_all = "camelCase")]
    Chat {
        #[serde(default)]
        author_name: Option<String>,
        #[serde(default)]
        author_type: Option<String>,
        content: String,
    },
}

/// Events pushed to websocket subscribers, tagged by `op`.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "op")]
#[serde(rename_all = "camelCase")]
pub enum OutgoingMessage {
    /// First message after the upgrade.
    #[serde(rename_all = "camelCase")]
    Ready {
        stream_name: String,
        sync: PlaybackPosition,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_song: Option<NowPlaying>,
    },
    /// Reply to this socket's `join`.
    Joined { listener: ListenerInfo },
    /// Reply to this socket's `heartbeat`.
    #[serde(rename_all = "camelCase")]
    HeartbeatAck { listener_id: ListenerId },
    /// Reply to this socket's `leave`.
    #[serde(rename_all = "camelCase")]
    Left { listener_id: ListenerId },
    /// A chat message was appended (fanned out to every subscriber).
    Chat { message: ChatMessageInfo },
    /// Aggregate presence counts changed.
    ListenerUpdate { counts: ListenerCounts },
    /// The track slot rolled over.
    #[serde(rename_all = "camelCase")]
    Position {
        sync: PlaybackPosition,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_song: Option<NowPlaying>,
    },
    /// Periodic node stats.
    Stats(PlatformStats),
    /// A request from this socket failed.
    Error { message: String },
}

use serde::{Deserialize, Serialize};

use crate::common::{ListenerId, UnixMillis};
use crate::radio::{
    ChatAuthor, ChatMessage, ListenerCategory, ListenerRecord, NowPlaying, PlaybackPosition,
    PresenceSnapshot,
};

/// Request body for joining presence.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Raw category string; validated against the recognized set.
    pub category: String,
    pub display_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub listener_id: ListenerId,
    pub listener_type: ListenerCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_name: Option<String>,
}

/// A presence record as seen on the wire.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListenerInfo {
    pub id: ListenerId,
    pub listener_type: ListenerCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_name: Option<String>,
    pub joined_at: UnixMillis,
    pub last_heartbeat: UnixMillis,
}

impl From<ListenerRecord> for ListenerInfo {
    fn from(r: ListenerRecord) -> Self {
        Self {
            id: r.id,
            listener_type: r.category,
            listener_name: r.display_name,
            joined_at: r.joined_at_ms,
            last_heartbeat: r.last_heartbeat_ms,
        }
    }
}

/// Request body for posting a chat message.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub author_name: Option<String>,
    /// Raw author type string (`agent`/`human`/`system`).
    pub author_type: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageInfo {
    pub id: String,
    pub author_name: String,
    pub author_type: ChatAuthor,
    pub content: String,
    pub posted_at: UnixMillis,
}

impl From<ChatMessage> for ChatMessageInfo {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            author_name: m.author_name,
            author_type: m.author_type,
            content: m.content,
            posted_at: m.posted_at_ms,
        }
    }
}

/// Request body for the external playlist-advance collaborator.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    /// Falls back to the configured default when omitted.
    pub track_duration_secs: Option<u64>,
    pub song: Option<NowPlaying>,
}

/// Full snapshot of the stream: sync position, current song, live listeners,
/// recent chat.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioStatusResponse {
    pub status: StreamStatus,
    pub stream_name: String,
    pub sync: PlaybackPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_song: Option<NowPlaying>,
    pub listener_count: usize,
    pub agent_count: usize,
    pub human_count: usize,
    pub anonymous_count: usize,
    pub listeners: Vec<ListenerInfo>,
    pub chat: Vec<ChatMessageInfo>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Live,
    Offline,
}

/// Aggregate listener counts pushed to subscribers.
#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct ListenerCounts {
    pub total: usize,
    pub agents: usize,
    pub humans: usize,
    pub anonymous: usize,
}

impl From<&PresenceSnapshot> for ListenerCounts {
    fn from(s: &PresenceSnapshot) -> Self {
        Self {
            total: s.total,
            agents: s.agents,
            humans: s.humans,
            anonymous: s.anonymous,
        }
    }
}

/// Response for the `info` endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub version: Version,
    pub build_time: u64,
    pub git: GitInfo,
    pub stream_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub semver: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    pub branch: String,
    pub commit: String,
    pub commit_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::ChatAuthor;

    #[test]
    fn listener_info_wire_shape() {
        let info = ListenerInfo {
            id: ListenerId("abc123".into()),
            listener_type: ListenerCategory::Agent,
            listener_name: Some("Deepmind Molt".into()),
            joined_at: 1,
            last_heartbeat: 2,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["listenerType"], "agent");
        assert_eq!(json["listenerName"], "Deepmind Molt");
        assert_eq!(json["lastHeartbeat"], 2);
    }

    #[test]
    fn chat_message_info_wire_shape() {
        let info = ChatMessageInfo {
            id: "m1".into(),
            author_name: "system".into(),
            author_type: ChatAuthor::System,
            content: "now playing".into(),
            posted_at: 9,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["authorType"], "system");
        assert_eq!(json["postedAt"], 9);
    }

    #[test]
    fn join_request_accepts_camel_case() {
        let req: JoinRequest =
            serde_json::from_str(r#"{"category":"human","displayName":"bob"}"#).unwrap();
        assert_eq!(req.category, "human");
        assert_eq!(req.display_name.as_deref(), Some("bob"));
    }
}

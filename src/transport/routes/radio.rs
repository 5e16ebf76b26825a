use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::common::{ApiError, ListenerId, now_ms};
use crate::protocol::{
    AdvanceRequest, ChatQuery, ChatRequest, JoinRequest, JoinResponse, ListenerInfo,
    OutgoingMessage, RadioStatusResponse, StreamStatus,
};
use crate::radio::{ChatAuthor, ListenerCategory};
use crate::server::AppState;

/// GET /v1/radio/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = now_ms();
    let (sync, current_song) = {
        let stream = state.stream.read();
        match stream.position(now) {
            Ok(sync) => (sync, stream.current_song.clone()),
            Err(err) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiError::new(500, err.to_string(), "/v1/radio/status")),
                )
                    .into_response();
            }
        }
    };

    let snapshot = state.presence.snapshot(now);
    let chat = state.chat.recent(state.config.radio.chat_history_limit);

    Json(RadioStatusResponse {
        status: StreamStatus::Live,
        stream_name: state.config.radio.stream_name.clone(),
        sync,
        current_song,
        listener_count: snapshot.total,
        agent_count: snapshot.agents,
        human_count: snapshot.humans,
        anonymous_count: snapshot.anonymous,
        listeners: snapshot.records.into_iter().map(Into::into).collect(),
        chat: chat.into_iter().map(Into::into).collect(),
    })
    .into_response()
}

/// GET /v1/radio/sync
pub async fn get_sync(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let position = state.stream.read().position(now_ms());
    match position {
        Ok(sync) => Json(sync).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(500, err.to_string(), "/v1/radio/sync")),
        )
            .into_response(),
    }
}

/// POST /v1/radio/listeners
pub async fn join(
    State(state): State<Arc<AppState>>,
    Json(body): Json<JoinRequest>,
) -> impl IntoResponse {
    let category = match ListenerCategory::parse(&body.category) {
        Ok(c) => c,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::from_radio(&err, "/v1/radio/listeners")),
            )
                .into_response();
        }
    };

    let record = state.presence.join(category, body.display_name, now_ms());
    info!(
        "listener joined: id={} category={} name={:?}",
        record.id, record.category, record.display_name
    );
    state.broadcast_listener_counts();

    Json(JoinResponse {
        listener_id: record.id,
        listener_type: record.category,
        listener_name: record.display_name,
    })
    .into_response()
}

/// POST /v1/radio/listeners/{listenerId}/heartbeat
pub async fn heartbeat(
    Path(listener_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let id = ListenerId::from(listener_id);
    match state.presence.heartbeat(&id, now_ms()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::from_radio(
                &err,
                format!("/v1/radio/listeners/{}/heartbeat", id),
            )),
        )
            .into_response(),
    }
}

/// DELETE /v1/radio/listeners/{listenerId}
pub async fn leave(
    Path(listener_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let id = ListenerId::from(listener_id);
    match state.presence.leave(&id) {
        Ok(record) => {
            info!("listener left: id={} category={}", record.id, record.category);
            state.broadcast_listener_counts();
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::from_radio(
                &err,
                format!("/v1/radio/listeners/{}", id),
            )),
        )
            .into_response(),
    }
}

/// GET /v1/radio/listeners
pub async fn get_listeners(State(state): State<Arc<AppState>>) -> Json<Vec<ListenerInfo>> {
    let snapshot = state.presence.snapshot(now_ms());
    Json(snapshot.records.into_iter().map(Into::into).collect())
}

/// GET /v1/radio/chat
pub async fn get_chat(
    Query(query): Query<ChatQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let limit = query
        .limit
        .unwrap_or(state.config.radio.chat_history_limit);
    let messages: Vec<crate::protocol::ChatMessageInfo> = state
        .chat
        .recent(limit)
        .into_iter()
        .map(Into::into)
        .collect();
    Json(messages)
}

/// POST /v1/radio/chat
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    let author_type = match ChatAuthor::parse(&body.author_type) {
        Ok(a) => a,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::from_radio(&err, "/v1/radio/chat")),
            )
                .into_response();
        }
    };

    let author_name = body.author_name.unwrap_or_else(|| "anonymous".to_string());
    match state
        .chat
        .append(author_name, author_type, &body.content, now_ms())
    {
        Ok(message) => {
            let info: crate::protocol::ChatMessageInfo = message.into();
            state.broadcast(&OutgoingMessage::Chat {
                message: info.clone(),
            });
            (StatusCode::CREATED, Json(info)).into_response()
        }
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::from_radio(&err, "/v1/radio/chat")),
        )
            .into_response(),
    }
}

/// POST /v1/radio/advance
///
/// The playlist-advance collaborator lives outside this node; this is its
/// hook for rolling the slot over to a new track.
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdvanceRequest>,
) -> impl IntoResponse {
    let duration = body
        .track_duration_secs
        .unwrap_or(state.config.radio.default_track_duration_secs);
    let now = now_ms();

    let result = {
        let mut stream = state.stream.write();
        stream
            .advance_track(duration, body.song.clone(), now)
            .and_then(|_| stream.position(now))
    };

    match result {
        Ok(sync) => {
            info!(
                "track advanced: duration={}s song={:?}",
                duration,
                body.song.as_ref().map(|s| s.title.as_str())
            );
            state.broadcast(&OutgoingMessage::Position {
                sync,
                current_song: body.song,
            });
            Json(sync).into_response()
        }
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::from_radio(&err, "/v1/radio/advance")),
        )
            .into_response(),
    }
}

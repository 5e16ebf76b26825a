use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::monitoring::collect_stats;
use crate::protocol::{GitInfo, InfoResponse, Version};
use crate::server::AppState;

/// GET /version
pub async fn get_version() -> impl IntoResponse {
    env!("CARGO_PKG_VERSION")
}

/// GET /v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(collect_stats(&state))
}

/// GET /v1/info
pub async fn get_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let semver = env!("CARGO_PKG_VERSION");

    Json(InfoResponse {
        version: Version {
            semver: semver.to_string(),
            major: parse_part(env!("CARGO_PKG_VERSION_MAJOR")),
            minor: parse_part(env!("CARGO_PKG_VERSION_MINOR")),
            patch: parse_part(env!("CARGO_PKG_VERSION_PATCH")),
        },
        build_time: option_env!("BUILD_TIME")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        git: GitInfo {
            branch: option_env!("GIT_BRANCH").unwrap_or("unknown").to_string(),
            commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
            commit_time: option_env!("GIT_COMMIT_TIME")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        },
        stream_name: state.config.radio.stream_name.clone(),
    })
}

fn parse_part(raw: &str) -> u32 {
    raw.parse().unwrap_or(0)
}

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    server::AppState,
    transport::{
        middleware::{add_response_headers, check_auth},
        routes::{radio, stats},
    },
};

const API_V1: &str = "/v1";

pub fn router(state: Arc<AppState>) -> Router {
    let v1_routes = Router::new()
        .route("/info", get(stats::get_info))
        .route("/stats", get(stats::get_stats))
        .route("/radio/status", get(radio::get_status))
        .route("/radio/sync", get(radio::get_sync))
        .route(
            "/radio/listeners",
            get(radio::get_listeners).post(radio::join),
        )
        .route(
            "/radio/listeners/{listener_id}/heartbeat",
            post(radio::heartbeat),
        )
        .route("/radio/listeners/{listener_id}", axum::routing::delete(radio::leave))
        .route("/radio/chat", get(radio::get_chat).post(radio::post_chat))
        .route("/radio/advance", post(radio::advance));

    Router::new()
        .nest(API_V1, v1_routes)
        .route("/version", get(stats::get_version))
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .layer(middleware::from_fn(add_response_headers))
        .with_state(state)
}

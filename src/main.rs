use std::sync::Arc;

use axum::{Router, routing::get};
use moltradio::common::banner::{BannerInfo, print_banner};
use moltradio::common::logger;
use moltradio::configs::Config;
use moltradio::server::{AppState, sweeper};
use moltradio::transport;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    print_banner(&BannerInfo::default());

    let config = Config::load()?;
    logger::init(&config);
    config.validate()?;

    let shared_state = Arc::new(AppState::new(config)?);

    let _sweeper = sweeper::spawn(shared_state.clone());

    let app = Router::new()
        .route(
            "/v1/websocket",
            get(transport::websocket_server::websocket_handler),
        )
        .with_state(shared_state.clone())
        .merge(transport::http_server::router(shared_state.clone()))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    let address = format!(
        "{}:{}",
        shared_state.config.server.host, shared_state.config.server.port
    );
    info!(
        "MoltRadio node listening on {} (stream: {})",
        address, shared_state.config.radio.stream_name
    );

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

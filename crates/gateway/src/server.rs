use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::get,
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use seedstream_config::SeedstreamConfig;

use crate::{
    auth_routes::{self, CALLBACK_PATH},
    state::GatewayState,
    stream_routes::{self, MANIFEST_PATH},
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/authorize", get(auth_routes::authorize_handler))
        .route("/authorize", get(auth_routes::authorize_handler))
        .route(CALLBACK_PATH, get(auth_routes::callback_handler))
        .route("/poll", get(auth_routes::callback_handler))
        .route("/api/token", get(auth_routes::token_status_handler))
        .route("/token", get(auth_routes::token_status_handler))
        .route(MANIFEST_PATH, get(stream_routes::manifest_handler))
        .route("/api/manifest.json", get(stream_routes::manifest_handler))
        .route("/stream/{kind}/{id}", get(stream_routes::stream_handler))
        .route("/api/stream", get(stream_routes::all_streams_handler))
        .layer(cors)
        .with_state(AppState { gateway: state })
}

/// Start the HTTP server and serve until the process is stopped.
pub async fn start_gateway(config: SeedstreamConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let state = GatewayState::from_config(config)?;

    if state.token().await.is_none() {
        warn!("no seedr token configured, visit /api/authorize to obtain one");
    }

    let app = build_gateway_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "seedstream listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.gateway.config.addon.name,
        "status": "running",
        "authorize": "/api/authorize",
        "poll": CALLBACK_PATH,
        "token": "/api/token",
        "manifest": MANIFEST_PATH,
    }))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.gateway.version,
    }))
}

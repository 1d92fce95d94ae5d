//! Stremio addon routes.

use {
    axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    tracing::{debug, warn},
};

use seedstream_seedr::{AddonManifest, SeedrClient, StreamResponse, resolve_streams};

use crate::server::AppState;

pub const MANIFEST_PATH: &str = "/manifest.json";

pub(crate) const TOKEN_MISSING: &str = "SEEDR_TOKEN not configured. Run /api/authorize first.";
pub(crate) const SEEDR_API_ERROR: &str = "Seedr API error";
pub(crate) const NOT_FOUND: &str = "Not found";

/// `GET /manifest.json`
pub async fn manifest_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(AddonManifest::from(&state.gateway.config.addon))
}

/// `GET /stream/{type}/{id}.json`. Every playable file is offered whatever
/// the requested item is. Ids without the `.json` suffix are 404.
pub async fn stream_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let Some(id) = id.strip_suffix(".json").filter(|id| !id.is_empty()) else {
        return (StatusCode::NOT_FOUND, Json(StreamResponse::error(NOT_FOUND))).into_response();
    };
    debug!(kind = %kind, id = %id, "stream request");
    streams(&state).await.into_response()
}

/// `GET /api/stream`
pub async fn all_streams_handler(State(state): State<AppState>) -> impl IntoResponse {
    streams(&state).await
}

async fn streams(state: &AppState) -> (StatusCode, Json<StreamResponse>) {
    let Some(token) = state.gateway.token().await else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StreamResponse::error(TOKEN_MISSING)),
        );
    };

    let seedr = &state.gateway.config.seedr;
    let client = SeedrClient::new(state.gateway.http.clone(), seedr.api_base.clone(), token);
    match resolve_streams(&client, seedr.max_depth).await {
        Ok(streams) => (StatusCode::OK, Json(StreamResponse::ok(streams))),
        Err(e) => {
            warn!(error = %e, "seedr listing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StreamResponse::error(SEEDR_API_ERROR)),
            )
        },
    }
}

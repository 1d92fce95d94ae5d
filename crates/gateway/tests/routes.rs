#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Drives the real router over loopback against a fake Seedr.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use {
    axum::{
        Form, Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    },
    rstest::rstest,
    secrecy::Secret,
    tokio::net::TcpListener,
};

use {
    seedstream_config::SeedstreamConfig,
    seedstream_gateway::{GatewayState, build_gateway_app},
};

/// Knobs for the fake provider.
#[derive(Default)]
struct Provider {
    approved: AtomicBool,
    fail_device: AtomicBool,
    fail_token: AtomicBool,
    issued: AtomicUsize,
    /// Device code seen by the last token request.
    last_device_code: std::sync::Mutex<Option<String>>,
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_provider(provider: Arc<Provider>) -> String {
    let device = Arc::clone(&provider);
    let token = Arc::clone(&provider);
    let app = Router::new()
        .route(
            "/oauth/device",
            post(move || {
                let provider = Arc::clone(&device);
                async move {
                    if provider.fail_device.load(Ordering::SeqCst) {
                        return (StatusCode::BAD_GATEWAY, "down").into_response();
                    }
                    let n = provider.issued.fetch_add(1, Ordering::SeqCst) + 1;
                    let (device_code, user_code) = if n == 1 {
                        ("D1".to_string(), "ABC-123".to_string())
                    } else {
                        (format!("D{n}"), format!("XYZ-00{n}"))
                    };
                    Json(serde_json::json!({
                        "device_code": device_code,
                        "user_code": user_code,
                        "verification_uri": "https://www.seedr.cc/devices",
                        "expires_in": 600
                    }))
                    .into_response()
                }
            }),
        )
        .route(
            "/oauth/token",
            post(
                move |Form(form): Form<std::collections::HashMap<String, String>>| {
                    let provider = Arc::clone(&token);
                    async move {
                        *provider.last_device_code.lock().unwrap() = form.get("device_code").cloned();
                        if provider.fail_token.load(Ordering::SeqCst) {
                            return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
                        }
                        if provider.approved.load(Ordering::SeqCst) {
                            Json(serde_json::json!({ "access_token": "tok_xyz" })).into_response()
                        } else {
                            Json(serde_json::json!({ "error": "authorization_pending" }))
                                .into_response()
                        }
                    }
                },
            ),
        )
        .route("/rest/folder", get(root_folder))
        .route("/rest/folder/{id}", get(sub_folder));
    format!("http://{}", serve(app).await)
}

async fn root_folder(headers: HeaderMap) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer bad_tok") {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }
    Json(serde_json::json!({
        "folders": [{"id": 7, "name": "Movies"}],
        "files": [
            {"name": "readme.txt", "folder_file_id": 1},
            {"name": "Trailer.mp4", "folder_file_id": 2}
        ]
    }))
    .into_response()
}

async fn sub_folder(Path(id): Path<u64>) -> impl IntoResponse {
    Json(serde_json::json!({
        "folders": [],
        "files": [{"name": format!("movie-{id}.mkv"), "folder_file_id": 70}]
    }))
}

fn config(provider: &str, token: Option<&str>) -> SeedstreamConfig {
    let mut config = SeedstreamConfig::default();
    config.seedr.device_url = format!("{provider}/oauth/device");
    config.seedr.token_url = format!("{provider}/oauth/token");
    config.seedr.api_base = format!("{provider}/rest");
    config.seedr.token = token.map(|t| Secret::new(t.to_string()));
    config
}

async fn start_gateway(config: SeedstreamConfig) -> String {
    let state = GatewayState::from_config(config).unwrap();
    format!("http://{}", serve(build_gateway_app(state)).await)
}

async fn get_text(url: String) -> (u16, String) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.text().await.unwrap())
}

#[tokio::test]
async fn poll_before_authorize_is_guidance() {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, None)).await;

    let (status, body) = get_text(format!("{gw}/api/callback")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "No device code found. Run /api/authorize first.");
}

#[tokio::test]
async fn device_flow_end_to_end() {
    let fake = Arc::new(Provider::default());
    let provider = start_provider(Arc::clone(&fake)).await;
    let gw = start_gateway(config(&provider, None)).await;

    let (status, page) = get_text(format!("{gw}/api/authorize")).await;
    assert_eq!(status, 200);
    assert!(page.contains("ABC-123"));
    assert!(page.contains("www.seedr.cc"));
    assert!(page.contains("callback"));

    let (status, body) = get_text(format!("{gw}/api/callback")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Device not approved yet. Approve and try again.");
    assert_eq!(fake.last_device_code.lock().unwrap().as_deref(), Some("D1"));

    let status: serde_json::Value = reqwest::get(format!("{gw}/api/token"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status, serde_json::json!({ "authorized": false, "source": null }));

    fake.approved.store(true, Ordering::SeqCst);
    let resp = reqwest::get(format!("{gw}/api/callback")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["cache-control"], "no-store");
    let page = resp.text().await.unwrap();
    assert_eq!(page.matches("tok_xyz").count(), 1);
    assert!(page.contains("SEEDR_TOKEN"));

    let status: serde_json::Value = reqwest::get(format!("{gw}/token"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        status,
        serde_json::json!({ "authorized": true, "source": "device_flow" })
    );
}

#[tokio::test]
async fn reissue_polls_latest_device_code() {
    let fake = Arc::new(Provider::default());
    let provider = start_provider(Arc::clone(&fake)).await;
    let gw = start_gateway(config(&provider, None)).await;

    get_text(format!("{gw}/authorize")).await;
    let (_, page) = get_text(format!("{gw}/authorize")).await;
    assert!(page.contains("XYZ-002"));

    get_text(format!("{gw}/poll")).await;
    assert_eq!(fake.last_device_code.lock().unwrap().as_deref(), Some("D2"));
}

#[tokio::test]
async fn upstream_failures_are_500() {
    let fake = Arc::new(Provider::default());
    let provider = start_provider(Arc::clone(&fake)).await;
    let gw = start_gateway(config(&provider, None)).await;

    fake.fail_device.store(true, Ordering::SeqCst);
    let (status, _) = get_text(format!("{gw}/api/authorize")).await;
    assert_eq!(status, 500);

    fake.fail_device.store(false, Ordering::SeqCst);
    let (status, _) = get_text(format!("{gw}/api/authorize")).await;
    assert_eq!(status, 200);

    fake.fail_token.store(true, Ordering::SeqCst);
    let (status, body) = get_text(format!("{gw}/api/callback")).await;
    assert_eq!(status, 500);
    assert_eq!(body, "Authorization failed");
}

#[tokio::test]
async fn stream_without_token() {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, None)).await;

    let resp = reqwest::get(format!("{gw}/stream/movie/tt0111161.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "streams": [],
            "error": "SEEDR_TOKEN not configured. Run /api/authorize first."
        })
    );
}

#[tokio::test]
async fn stream_lists_playable_files() {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, Some("good_tok"))).await;

    let resp = reqwest::get(format!("{gw}/stream/movie/tt0111161.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let streams = body["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["name"], "Seedr");
    assert_eq!(streams[0]["title"], "Trailer.mp4");
    assert_eq!(
        streams[0]["url"],
        format!("{provider}/rest/file/2?token=good_tok")
    );
    assert_eq!(streams[1]["title"], "movie-7.mkv");
    assert!(body.get("error").is_none());
}

#[rstest]
#[case("/stream/movie/tt0111161")]
#[case("/stream/movie/.json")]
#[tokio::test]
async fn stream_path_needs_json_suffix(#[case] path: &str) {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, Some("good_tok"))).await;

    let resp = reqwest::get(format!("{gw}{path}")).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "streams": [], "error": "Not found" })
    );
}

#[tokio::test]
async fn stream_seedr_error() {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, Some("bad_tok"))).await;

    let resp = reqwest::get(format!("{gw}/api/stream")).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "streams": [], "error": "Seedr API error" })
    );
}

#[rstest]
#[case("/manifest.json")]
#[case("/api/manifest.json")]
#[tokio::test]
async fn manifest_routes(#[case] path: &str) {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, None)).await;

    let manifest: serde_json::Value = reqwest::get(format!("{gw}{path}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(manifest["id"], "org.seedr.stremio");
    assert_eq!(manifest["resources"], serde_json::json!(["stream"]));
    assert_eq!(manifest["idPrefixes"], serde_json::json!(["tt"]));
}

#[tokio::test]
async fn index_and_health() {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, None)).await;

    let index: serde_json::Value = reqwest::get(format!("{gw}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(index["status"], "running");
    assert_eq!(index["poll"], "/api/callback");

    let health: serde_json::Value = reqwest::get(format!("{gw}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let provider = start_provider(Arc::default()).await;
    let gw = start_gateway(config(&provider, None)).await;

    let resp = reqwest::Client::new()
        .get(format!("{gw}/manifest.json"))
        .header("Origin", "https://web.stremio.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

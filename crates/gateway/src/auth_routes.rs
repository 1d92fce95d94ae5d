//! Device-flow routes: issue a code, exchange it, report token status.

use {
    askama::Template,
    axum::{
        Json,
        extract::State,
        http::{HeaderValue, StatusCode, header},
        response::{Html, IntoResponse, Response},
    },
    secrecy::ExposeSecret,
    tracing::{error, warn},
};

use seedstream_oauth::{Error as OAuthError, TokenExchangeResult};

use crate::{server::AppState, state::TokenSource, stream_routes::MANIFEST_PATH};

pub const CALLBACK_PATH: &str = "/api/callback";

pub(crate) const NO_DEVICE_CODE: &str = "No device code found. Run /api/authorize first.";
pub(crate) const NOT_APPROVED: &str = "Device not approved yet. Approve and try again.";
pub(crate) const AUTHORIZATION_FAILED: &str = "Authorization failed";
pub(crate) const DEVICE_CODE_FAILED: &str = "Failed to get device code";

#[derive(Template)]
#[template(path = "authorize.html", escape = "html")]
struct AuthorizeTemplate<'a> {
    addon_name: &'a str,
    user_code: &'a str,
    verification_uri: &'a str,
    expires_minutes: Option<u64>,
    callback_path: &'a str,
}

#[derive(Template)]
#[template(path = "authorized.html", escape = "html")]
struct AuthorizedTemplate<'a> {
    addon_name: &'a str,
    access_token: &'a str,
    manifest_path: &'a str,
}

/// `GET /api/authorize`: issue a device code and show the user code.
pub async fn authorize_handler(State(state): State<AppState>) -> Response {
    let request = match state.gateway.flow.issue().await {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "device code request failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, DEVICE_CODE_FAILED).into_response();
        },
    };

    let template = AuthorizeTemplate {
        addon_name: &state.gateway.config.addon.name,
        user_code: &request.user_code,
        verification_uri: &request.verification_uri,
        expires_minutes: request.expires_in.map(|secs| secs.div_ceil(60)),
        callback_path: CALLBACK_PATH,
    };
    render(&template, "authorize")
}

/// `GET /api/callback`: exchange the live device code once.
pub async fn callback_handler(State(state): State<AppState>) -> Response {
    match state.gateway.flow.poll().await {
        Ok(TokenExchangeResult::Authorized { access_token }) => {
            state
                .gateway
                .set_token(access_token.clone(), TokenSource::DeviceFlow)
                .await;
            let template = AuthorizedTemplate {
                addon_name: &state.gateway.config.addon.name,
                access_token: access_token.expose_secret(),
                manifest_path: MANIFEST_PATH,
            };
            let mut resp = render(&template, "authorized");
            resp.headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            resp
        },
        Ok(TokenExchangeResult::Pending) => (StatusCode::OK, NOT_APPROVED).into_response(),
        Err(OAuthError::NoPendingRequest) => (StatusCode::OK, NO_DEVICE_CODE).into_response(),
        Err(e) => {
            error!(error = %e, "device token exchange failed");
            (StatusCode::INTERNAL_SERVER_ERROR, AUTHORIZATION_FAILED).into_response()
        },
    }
}

/// `GET /api/token`: whether streaming has a token, and where it came from.
pub async fn token_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let source = state.gateway.token_source().await;
    Json(serde_json::json!({
        "authorized": source.is_some(),
        "source": source,
    }))
}

fn render(template: &impl Template, name: &str) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(error = %e, template = name, "failed to render template");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        },
    }
}

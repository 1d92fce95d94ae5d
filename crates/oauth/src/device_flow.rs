use std::sync::Arc;

use {
    secrecy::Secret,
    serde::{Deserialize, Deserializer, de::Error as _},
    serde_json::Value,
    tracing::{debug, info, warn},
};

use crate::{
    error::{Error, Result},
    store::DeviceCodeStore,
    types::{DeviceAuthorizationRequest, DeviceFlowConfig, TokenExchangeResult},
};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Response from the device-authorization endpoint.
#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    #[serde(deserialize_with = "string_or_number")]
    device_code: String,
    #[serde(deserialize_with = "string_or_number")]
    user_code: String,
    #[serde(default, alias = "verification_url")]
    verification_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    expires_in: Option<u64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    interval: Option<u64>,
}

/// Codes may arrive as JSON numbers; keep their decimal text.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Seconds as a number or numeric string. Anything else is dropped.
fn lenient_seconds<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<u64>, D::Error> {
    let value = Value::deserialize(d)?;
    let seconds = match &value {
        Value::Null => None,
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if seconds.is_none() && !value.is_null() {
        debug!(value = %value, "ignoring unusable duration in device code response");
    }
    Ok(seconds)
}

#[derive(Debug, Default, Deserialize)]
struct TokenPollResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Request a device code from the provider. One request, no retry.
pub async fn request_device_code(
    client: &reqwest::Client,
    config: &DeviceFlowConfig,
) -> Result<DeviceAuthorizationRequest> {
    let resp = client
        .post(&config.device_url)
        .header("Accept", "application/json")
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
        ])
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        warn!(status = %status, body = %body, "device code request failed");
        return Err(Error::upstream(format!(
            "device code request returned {status}"
        )));
    }

    let parsed: DeviceCodeResponse = serde_json::from_str(&body).map_err(|e| {
        warn!(error = %e, body = %body, "device code response did not parse");
        Error::upstream(format!("invalid device code response: {e}"))
    })?;

    Ok(DeviceAuthorizationRequest {
        device_code: parsed.device_code,
        user_code: parsed.user_code,
        verification_uri: parsed
            .verification_uri
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| config.verification_uri.clone()),
        expires_in: parsed.expires_in,
        interval: parsed.interval,
        issued_at: chrono::Utc::now(),
    })
}

/// Ask the token endpoint once whether `device_code` has been approved.
pub async fn exchange_device_code(
    client: &reqwest::Client,
    config: &DeviceFlowConfig,
    device_code: &str,
) -> Result<TokenExchangeResult> {
    let resp = client
        .post(&config.token_url)
        .header("Accept", "application/json")
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("grant_type", DEVICE_CODE_GRANT),
            ("device_code", device_code),
        ])
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        warn!(status = %status, body = %body, "token exchange failed");
        return Err(Error::upstream(format!("token exchange returned {status}")));
    }

    let parsed: TokenPollResponse = if body.trim().is_empty() {
        TokenPollResponse::default()
    } else {
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %body, "token response did not parse");
            Error::upstream(format!("invalid token response: {e}"))
        })?
    };

    if let Some(token) = parsed.access_token.filter(|t| !t.is_empty()) {
        return Ok(TokenExchangeResult::Authorized {
            access_token: Secret::new(token),
        });
    }

    match parsed.error.as_deref() {
        None | Some("authorization_pending") | Some("slow_down") => {
            Ok(TokenExchangeResult::Pending)
        },
        Some(err) => {
            warn!(error = err, "token endpoint rejected device code");
            Err(Error::upstream(format!("device flow error: {err}")))
        },
    }
}

/// Issuer and poller sharing one device-code store.
#[derive(Clone)]
pub struct DeviceFlow {
    client: reqwest::Client,
    config: DeviceFlowConfig,
    store: Arc<dyn DeviceCodeStore>,
}

impl DeviceFlow {
    pub fn new(
        client: reqwest::Client,
        config: DeviceFlowConfig,
        store: Arc<dyn DeviceCodeStore>,
    ) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn DeviceCodeStore> {
        &self.store
    }

    /// Issue a new device code and make it the live one.
    ///
    /// Any earlier, unfinished authorization is discarded. On failure the
    /// store is left as it was.
    pub async fn issue(&self) -> Result<DeviceAuthorizationRequest> {
        let request = request_device_code(&self.client, &self.config).await?;
        info!(
            user_code = %request.user_code,
            verification_uri = %request.verification_uri,
            "device code issued"
        );
        if let Some(previous) = self.store.replace(request.clone()) {
            debug!(
                previous_user_code = %previous.user_code,
                "superseded unfinished device authorization"
            );
        }
        Ok(request)
    }

    /// Exchange the live device code once. Does not clear the store.
    pub async fn poll(&self) -> Result<TokenExchangeResult> {
        let Some(request) = self.store.current() else {
            debug!("poll without an issued device code");
            return Err(Error::NoPendingRequest);
        };

        let result = exchange_device_code(&self.client, &self.config, &request.device_code).await?;
        match &result {
            TokenExchangeResult::Pending => {
                debug!(user_code = %request.user_code, "device not approved yet");
            },
            TokenExchangeResult::Authorized { .. } => {
                info!(user_code = %request.user_code, "device authorization approved");
            },
        }
        Ok(result)
    }
}

impl std::fmt::Debug for DeviceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceFlow")
            .field("config", &self.config)
            .field("live", &self.store.current().is_some())
            .finish()
    }
}

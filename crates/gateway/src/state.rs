use std::{sync::Arc, time::Duration};

use {
    secrecy::Secret,
    serde::Serialize,
    tokio::sync::RwLock,
    tracing::info,
};

use {
    seedstream_config::SeedstreamConfig,
    seedstream_oauth::{DeviceFlow, DeviceFlowConfig, InMemoryDeviceCodeStore},
};

// ── Active streaming token ───────────────────────────────────────────────────

/// Where the token used for Seedr listings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// `seedr.token` in the config file or `SEEDR_TOKEN`.
    Config,
    /// Returned by a successful poll of the device flow.
    DeviceFlow,
}

struct ActiveToken {
    token: Secret<String>,
    source: TokenSource,
}

// ── Gateway state ────────────────────────────────────────────────────────────

/// Everything the route handlers share.
pub struct GatewayState {
    pub config: SeedstreamConfig,
    pub http: reqwest::Client,
    pub flow: DeviceFlow,
    pub version: String,
    token: RwLock<Option<ActiveToken>>,
}

impl GatewayState {
    /// Build state from config: one HTTP client (user agent and timeout from
    /// `seedr`), a fresh in-memory device-code slot, and the configured token
    /// if there is one.
    pub fn from_config(config: SeedstreamConfig) -> reqwest::Result<Arc<Self>> {
        let http = build_http_client(&config)?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: SeedstreamConfig, http: reqwest::Client) -> Arc<Self> {
        let flow = DeviceFlow::new(
            http.clone(),
            DeviceFlowConfig::from(&config.seedr),
            Arc::new(InMemoryDeviceCodeStore::new()),
        );
        let token = config.seedr.token().cloned().map(|token| ActiveToken {
            token,
            source: TokenSource::Config,
        });

        Arc::new(Self {
            config,
            http,
            flow,
            version: env!("CARGO_PKG_VERSION").to_string(),
            token: RwLock::new(token),
        })
    }

    /// The token used for Seedr listings, if any.
    pub async fn token(&self) -> Option<Secret<String>> {
        self.token.read().await.as_ref().map(|t| t.token.clone())
    }

    pub async fn token_source(&self) -> Option<TokenSource> {
        self.token.read().await.as_ref().map(|t| t.source)
    }

    /// Make `token` the active one until the process exits or it is replaced.
    pub async fn set_token(&self, token: Secret<String>, source: TokenSource) {
        *self.token.write().await = Some(ActiveToken { token, source });
        info!(source = ?source, "active seedr token updated");
    }
}

pub fn build_http_client(config: &SeedstreamConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.seedr.user_agent.clone())
        .timeout(Duration::from_secs(config.seedr.request_timeout_secs))
        .build()
}

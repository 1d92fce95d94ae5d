//! Config schema types (server, Seedr upstream, addon manifest).

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedstreamConfig {
    pub server: ServerConfig,
    pub seedr: SeedrConfig,
    pub addon: AddonConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0" so hosted deployments are reachable.
    pub bind: String,
    /// Port to listen on. `PORT` overrides it.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Seedr upstream endpoints and credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedrConfig {
    pub client_id: String,
    pub scope: String,
    /// Device-authorization endpoint (issues `device_code` + `user_code`).
    pub device_url: String,
    /// Token-exchange endpoint polled with the stored device code.
    pub token_url: String,
    /// Base URL of the REST API used for folder listings and file links.
    pub api_base: String,
    /// Page the operator visits to enter the user code, when the provider
    /// does not return one.
    pub verification_uri: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// How many folder levels below the root are searched for videos.
    pub max_depth: usize,
    /// Access token obtained from the device flow (`SEEDR_TOKEN`).
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,
}

impl std::fmt::Debug for SeedrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedrConfig")
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .field("device_url", &self.device_url)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .field("verification_uri", &self.verification_uri)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_depth", &self.max_depth)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for SeedrConfig {
    fn default() -> Self {
        Self {
            client_id: "stremio-addon".into(),
            scope: "user".into(),
            device_url: "https://www.seedr.cc/oauth/device".into(),
            token_url: "https://www.seedr.cc/oauth/token".into(),
            api_base: "https://www.seedr.cc/rest".into(),
            verification_uri: "https://www.seedr.cc/devices".into(),
            user_agent: "Seedr-Stremio-Addon".into(),
            request_timeout_secs: 10,
            max_depth: 1,
            token: None,
        }
    }
}

impl SeedrConfig {
    /// The configured access token, if one is set and non-empty.
    pub fn token(&self) -> Option<&Secret<String>> {
        self.token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
    }
}

/// Values published in the addon manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AddonConfig {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub id_prefixes: Vec<String>,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: "org.seedr.stremio".into(),
            version: "1.0.0".into(),
            name: "Seedr Streams".into(),
            description: "Stream your Seedr files in Stremio using official device authentication"
                .into(),
            types: vec!["movie".into(), "series".into(), "other".into()],
            id_prefixes: vec!["tt".into()],
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

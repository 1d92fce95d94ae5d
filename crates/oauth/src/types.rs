use {
    chrono::{DateTime, Utc},
    secrecy::Secret,
    seedstream_config::SeedrConfig,
    serde::Serialize,
};

/// Endpoints and client identity used by the device flow.
#[derive(Debug, Clone)]
pub struct DeviceFlowConfig {
    pub client_id: String,
    pub scope: String,
    pub device_url: String,
    pub token_url: String,
    /// Used when the provider's device response omits `verification_uri`.
    pub verification_uri: String,
}

impl From<&SeedrConfig> for DeviceFlowConfig {
    fn from(cfg: &SeedrConfig) -> Self {
        Self {
            client_id: cfg.client_id.clone(),
            scope: cfg.scope.clone(),
            device_url: cfg.device_url.clone(),
            token_url: cfg.token_url.clone(),
            verification_uri: cfg.verification_uri.clone(),
        }
    }
}

/// The live device authorization. At most one exists per store; a newer
/// issuance replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceAuthorizationRequest {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    /// Lifetime reported by the provider. Not enforced locally.
    pub expires_in: Option<u64>,
    /// Suggested polling interval reported by the provider.
    pub interval: Option<u64>,
    pub issued_at: DateTime<Utc>,
}

/// Outcome of one token-exchange poll.
#[derive(Clone)]
pub enum TokenExchangeResult {
    /// The operator has not approved the device yet.
    Pending,
    /// Approved; the token is passed through exactly as the provider sent it.
    Authorized { access_token: Secret<String> },
}

impl TokenExchangeResult {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&Secret<String>> {
        match self {
            Self::Pending => None,
            Self::Authorized { access_token } => Some(access_token),
        }
    }
}

impl std::fmt::Debug for TokenExchangeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Authorized { .. } => f
                .debug_struct("Authorized")
                .field("access_token", &"[REDACTED]")
                .finish(),
        }
    }
}

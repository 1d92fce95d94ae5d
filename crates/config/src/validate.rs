//! Semantic checks on a loaded configuration.
//!
//! Unlike parse errors, these never stop loading; the binary logs them at
//! startup and refuses to start only when an error-level diagnostic exists.

use crate::schema::SeedstreamConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "seedr.token_url"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn push(&mut self, severity: Severity, path: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate endpoint URLs, timeouts, and credentials.
pub fn validate(config: &SeedstreamConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    let seedr = &config.seedr;

    for (path, value) in [
        ("seedr.device_url", &seedr.device_url),
        ("seedr.token_url", &seedr.token_url),
        ("seedr.api_base", &seedr.api_base),
        ("seedr.verification_uri", &seedr.verification_uri),
    ] {
        match url::Url::parse(value) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {},
            Ok(u) => result.push(
                Severity::Error,
                path,
                format!("unsupported scheme \"{}\"", u.scheme()),
            ),
            Err(e) => result.push(Severity::Error, path, format!("invalid URL: {e}")),
        }
    }

    if seedr.client_id.trim().is_empty() {
        result.push(Severity::Error, "seedr.client_id", "client_id is empty");
    }

    if seedr.request_timeout_secs == 0 {
        result.push(
            Severity::Error,
            "seedr.request_timeout_secs",
            "timeout must be at least one second",
        );
    }

    if seedr.token().is_none() {
        result.push(
            Severity::Warning,
            "seedr.token",
            "no Seedr token configured; streams stay empty until /api/authorize is completed",
        );
    }

    if config.addon.types.is_empty() {
        result.push(
            Severity::Warning,
            "addon.types",
            "manifest declares no content types",
        );
    }

    result
}

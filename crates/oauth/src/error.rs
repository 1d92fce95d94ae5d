#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `poll()` was called before any device code was issued.
    #[error("no device code found; run the authorize step first")]
    NoPendingRequest,

    /// Network failure, non-2xx status, or a body that cannot be interpreted.
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },
}

impl Error {
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

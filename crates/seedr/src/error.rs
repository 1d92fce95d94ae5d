#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SEEDR_TOKEN not configured")]
    MissingToken,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("seedr returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

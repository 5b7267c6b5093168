use reqwest::StatusCode;
use thiserror::Error;

/// Failures of calls against the stories backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid story url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid backend base url: {0}")]
    InvalidBaseUrl(url::ParseError),

    #[error("story url has no host: {0}")]
    MissingHost(String),

    #[error("response too large (>{0} bytes)")]
    BodyTooLarge(usize),

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// True when the backend rejected the request rather than the transport failing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if status.is_client_error())
    }
}

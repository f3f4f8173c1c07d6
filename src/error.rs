use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }
}

/// Failure taxonomy for a single fetch boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Transport failure, timeout, or a non-2xx status.
    #[error("network error: {0}")]
    Network(String),
    /// Body is not JSON or an expected field is missing or invalid.
    #[error("unexpected response format: {0}")]
    Format(String),
    /// Well-formed response that carried no entries.
    #[error("no data returned from {0}")]
    EmptyResult(String),
}

impl FetchError {
    pub fn network<T: Into<String>>(msg: T) -> Self {
        FetchError::Network(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        FetchError::Format(msg.into())
    }

    pub fn empty<T: Into<String>>(source: T) -> Self {
        FetchError::EmptyResult(source.into())
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, FetchError::EmptyResult(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Format(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Format(err.to_string())
    }
}

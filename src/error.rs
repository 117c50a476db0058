//! Error types shared by every request path.

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse failure category of a [`RestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad base address or resource path.
    Configuration,
    /// Connect, DNS, timeout or body read failure.
    Transport,
    /// The client's cancel scope fired.
    Cancellation,
    /// The server answered with a non-2xx status.
    HttpStatus,
    /// Payload encoding or response decoding failed.
    Serialization,
}

#[derive(Debug, Error)]
pub enum RestError {
    #[error("invalid base address {address:?}: {reason}")]
    Configuration { address: String, reason: String },

    #[error("timeout must be at least one second, got {secs}")]
    InvalidTimeout { secs: u64 },

    #[error("invalid resource path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: BoxError,
    },

    #[error("request to {url} was cancelled")]
    Cancelled { url: Url },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: Url, status: StatusCode },

    #[error("invalid JSON for {url}: {source}")]
    Serialization {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

impl RestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RestError::Configuration { .. }
            | RestError::InvalidTimeout { .. }
            | RestError::InvalidPath { .. } => ErrorKind::Configuration,
            RestError::Transport { .. } => ErrorKind::Transport,
            RestError::Cancelled { .. } => ErrorKind::Cancellation,
            RestError::HttpStatus { .. } => ErrorKind::HttpStatus,
            RestError::Serialization { .. } => ErrorKind::Serialization,
        }
    }

    /// True when the transport gave up because the request timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        match self {
            RestError::Transport { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// HTTP status for [`RestError::HttpStatus`], `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Wraps a reqwest failure, keeping status errors distinct from transport ones.
    pub(crate) fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => RestError::HttpStatus {
                url: url.clone(),
                status,
            },
            None => RestError::Transport {
                url: url.clone(),
                source: Box::new(error),
            },
        }
    }
}

pub type Result<T, E = RestError> = std::result::Result<T, E>;

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailure {
    /// Transport failure: connection refused, reset, DNS.
    Network,
    HttpStatus(u16),
    MalformedResponse,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Network => write!(f, "network error"),
            RequestFailure::HttpStatus(code) => write!(f, "http status {code}"),
            RequestFailure::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: RequestFailure,
    pub message: String,
}

impl RequestError {
    pub fn new(kind: RequestFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RequestFailure::Network, message)
    }

    pub fn status(code: u16) -> Self {
        Self::new(RequestFailure::HttpStatus(code), format!("server responded {code}"))
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(RequestFailure::MalformedResponse, message)
    }
}

/// Why a save run ended without reaching `Saved`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveFailure {
    #[error("no capturable messages on the page")]
    ScrapeEmpty,
    #[error("collection prompt dismissed")]
    UserCancelled,
    #[error("save request failed: {0}")]
    Request(#[from] RequestError),
}

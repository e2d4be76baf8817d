//! Error types returned by the client.
//!
//! "Not found" is never an error: lookups report absence as `None` or an
//! empty `Vec`. An [`Error`] always means the exchange itself failed.

use serde_json::{json, Value};
use thiserror::Error;

/// Message used when the service fails without a usable error payload.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service answered with a non-2xx status and an `{ "error": ... }` payload.
    #[error("service error: {0}")]
    Service(Value),

    /// The service answered with a non-2xx status and no usable payload.
    #[error("Server error (status {code})")]
    UnknownServer { code: u16 },

    /// A v1 endpoint answered with a status other than 2xx or 404.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid CPE URI: {0}")]
    InvalidCpeUri(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid endpoint '{0}': expected 'production', 'local' or an http(s) URL")]
    InvalidEndpoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps any displayable failure as a transport error.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(err.into())
    }

    /// The JSON error shape reported by the v2 package endpoint.
    ///
    /// `Service` payloads are returned verbatim; `UnknownServer` is
    /// synthesized as `{"error": "Server error", "code": <status>}`.
    pub fn payload(&self) -> Option<Value> {
        match self {
            Error::Service(payload) => Some(payload.clone()),
            Error::UnknownServer { code } => Some(json!({
                "error": GENERIC_SERVER_ERROR,
                "code": code,
            })),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

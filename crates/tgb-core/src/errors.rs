use crate::envelope::ResponseParameters;

/// Core error type for the bot client.
///
/// Adapter crates map their specific errors (HTTP client, filesystem) into this
/// type so callers can tell local failures apart from remote-reported ones.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("transport error calling {method}: {reason}")]
    Transport { method: String, reason: String },

    #[error("decode error for {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
        /// Raw response body that failed to decode.
        body: Vec<u8>,
    },

    #[error("{method} failed: {description}")]
    Api {
        method: String,
        description: String,
        error_code: Option<i32>,
        /// Retry and migration hints, when the service sent any.
        parameters: Option<ResponseParameters>,
    },

    #[error("{method} returned ok without a result")]
    MissingResult { method: String },
}

impl Error {
    /// `true` when the service answered with `ok=false`.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Api { .. })
    }

    /// Service-provided description for remote failures.
    pub fn description(&self) -> Option<&str> {
        match self {
            Error::Api { description, .. } => Some(description),
            _ => None,
        }
    }

    /// Seconds the service asked us to wait before the next call (flood control).
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Error::Api {
                parameters: Some(p),
                ..
            } => p.retry_after,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Envelope codec: parameter encoding and the generic response wrapper.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{domain::ChatId, errors::Error, Result};

/// Response wrapper returned by every Bot API method.
///
/// `result` is only kept when `ok` is true; [`decode`] drops it otherwise.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub description: Option<String>,
    pub result: Option<T>,
    pub error_code: Option<i32>,
    pub parameters: Option<ResponseParameters>,
}

/// Extra hints the service attaches to some failures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseParameters {
    pub migrate_to_chat_id: Option<ChatId>,
    pub retry_after: Option<u64>,
}

impl<T> Envelope<T> {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Convert into the typed result, mapping `ok=false` to [`Error::Api`].
    pub fn into_result(self, method: &str) -> Result<T> {
        if !self.ok {
            return Err(Error::Api {
                method: method.to_string(),
                description: self.description.unwrap_or_default(),
                error_code: self.error_code,
                parameters: self.parameters,
            });
        }
        self.result.ok_or_else(|| Error::MissingResult {
            method: method.to_string(),
        })
    }
}

/// Serialize method parameters to a JSON request body.
pub fn encode<P: Serialize + ?Sized>(params: &P) -> Result<Vec<u8>> {
    serde_json::to_vec(params).map_err(Error::Encode)
}

/// Decode a raw response body into an envelope around `T`.
///
/// A malformed body yields [`Error::Decode`] carrying the offending bytes.
pub fn decode<T: DeserializeOwned>(method: &str, body: &[u8]) -> Result<Envelope<T>> {
    let mut env: Envelope<T> = serde_json::from_slice(body).map_err(|source| Error::Decode {
        method: method.to_string(),
        source,
        body: body.to_vec(),
    })?;
    if !env.ok {
        env.result = None;
    }
    Ok(env)
}

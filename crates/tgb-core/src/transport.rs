use std::sync::Arc;

use async_trait::async_trait;

/// Failure below the Bot API: connection refused, TLS, body read.
///
/// Non-200 responses are not transport failures; their bodies are returned as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Hexagonal port for the HTTP call underneath every method invocation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON `body` (empty when the method takes no parameters) and return
    /// the raw response body unmodified.
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        (**self).post_json(url, body).await
    }
}

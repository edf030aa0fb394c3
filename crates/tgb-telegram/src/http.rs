use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use tgb_core::{
    errors::Error,
    transport::{Transport, TransportError},
    Result,
};

/// `reqwest`-backed transport.
///
/// Status codes are not interpreted: the Bot API reports failures inside the
/// JSON envelope, so non-200 bodies are returned for decoding like any other.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

// reqwest errors embed the request URL, which carries the bot token.
fn describe(e: reqwest::Error) -> TransportError {
    TransportError(e.without_url().to_string())
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(describe)?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(%status, "bot api returned non-success status");
        }

        let bytes = resp.bytes().await.map_err(describe)?;
        Ok(bytes.to_vec())
    }
}

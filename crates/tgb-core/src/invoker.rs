use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    envelope::{self, Envelope},
    errors::Error,
    transport::Transport,
    Result,
};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Builds `<base>/bot<token>/<method>` endpoints and executes one POST per call.
///
/// No retries and no timeout beyond the transport's own default.
pub struct MethodInvoker<T> {
    api_base: String,
    token: String,
    transport: T,
}

impl<T> fmt::Debug for MethodInvoker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvoker")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl<T: Transport> MethodInvoker<T> {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>, transport: T) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            api_base,
            token: token.into(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Invoke `method` and return the raw response body.
    pub async fn invoke<P>(&self, method: &str, params: Option<&P>) -> Result<Vec<u8>>
    where
        P: Serialize + Sync + ?Sized,
    {
        let body = match params {
            Some(p) => envelope::encode(p)?,
            None => Vec::new(),
        };

        tracing::debug!(method, body_len = body.len(), "invoking bot api method");

        self.transport
            .post_json(&self.endpoint(method), body)
            .await
            .map_err(|e| Error::Transport {
                method: method.to_string(),
                reason: e.0,
            })
    }

    /// Invoke `method` and decode the response into an envelope around `R`.
    pub async fn call<P, R>(&self, method: &str, params: Option<&P>) -> Result<Envelope<R>>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.invoke(method, params).await?;
        envelope::decode(method, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ChatId,
        params::{SendMessageParams, GET_ME, SEND_MESSAGE},
        transport::TransportError,
        types::User,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(String, Vec<u8>)>>,
        reply: Vec<u8>,
        fail: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_json(
            &self,
            url: &str,
            body: Vec<u8>,
        ) -> std::result::Result<Vec<u8>, TransportError> {
            self.calls.lock().unwrap().push((url.to_string(), body));
            if self.fail {
                return Err(TransportError("connection refused".to_string()));
            }
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn endpoint_embeds_token_and_method() {
        let inv = MethodInvoker::new(
            "https://api.telegram.org/",
            "123:abc",
            RecordingTransport::default(),
        );
        assert_eq!(
            inv.endpoint("getMe"),
            "https://api.telegram.org/bot123:abc/getMe"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let inv = MethodInvoker::new(DEFAULT_API_BASE, "secret", RecordingTransport::default());
        let dbg = format!("{inv:?}");
        assert!(!dbg.contains("secret"));
    }

    #[tokio::test]
    async fn invoke_without_params_sends_empty_body() {
        let transport = RecordingTransport {
            reply: br#"{"ok":true,"result":{"id":1,"first_name":"Bot"}}"#.to_vec(),
            ..Default::default()
        };
        let inv = MethodInvoker::new("http://local", "t", transport);
        let env: Envelope<User> = inv.call::<(), _>(GET_ME, None).await.unwrap();
        assert!(env.ok);

        let calls = inv.transport().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://local/bott/getMe");
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn invoke_returns_raw_body_and_encodes_params() {
        let transport = RecordingTransport {
            reply: b"not even json".to_vec(),
            ..Default::default()
        };
        let inv = MethodInvoker::new("http://local", "t", transport);
        let params = SendMessageParams {
            chat_id: ChatId(5),
            text: "hi".to_string(),
        };
        let raw = inv.invoke(SEND_MESSAGE, Some(&params)).await.unwrap();
        assert_eq!(raw, b"not even json".to_vec());

        let calls = inv.transport().calls.lock().unwrap();
        let sent: SendMessageParams = serde_json::from_slice(&calls[0].1).unwrap();
        assert_eq!(sent, params);
    }

    #[tokio::test]
    async fn transport_failure_is_recoverable() {
        let transport = RecordingTransport {
            fail: true,
            ..Default::default()
        };
        let inv = MethodInvoker::new("http://local", "t", transport);
        let err = inv.invoke::<()>(GET_ME, None).await.unwrap_err();
        match err {
            Error::Transport { method, reason } => {
                assert_eq!(method, "getMe");
                assert_eq!(reason, "connection refused");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

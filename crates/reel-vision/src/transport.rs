//! HTTP seam for the vision API.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Raw reply from the vision endpoint.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Connection-level failure (DNS, TLS, reset). Retryable.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One request/response exchange with the vision endpoint.
///
/// The deadline is enforced by the caller; implementations just send.
#[async_trait]
pub trait VisionTransport: Send + Sync {
    async fn send(&self, model: &str, body: &Value) -> Result<TransportReply, TransportError>;
}

/// Production transport: bearer-authenticated POST.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

// The credential must never reach logs.
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl VisionTransport for HttpTransport {
    async fn send(&self, _model: &str, body: &Value) -> Result<TransportReply, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(TransportReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_credential() {
        let transport = HttpTransport::new("https://example.test/v1", "hf_secret_key");
        let debug = format!("{transport:?}");
        assert!(!debug.contains("hf_secret_key"));
        assert!(debug.contains("<redacted>"));
    }
}

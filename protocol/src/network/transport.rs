//! HTTP transport to a node's REST interface.
//!
//! [`NodeTransport`] is the narrow seam the properties client and the
//! submitter talk through: one GET, one PUT, status plus body back. The
//! production implementation is [`HttpTransport`] over `reqwest`; tests plug
//! in scripted transports.
//!
//! A non-2xx status is not an error at this level. Interpreting the status
//! is the caller's job.

use async_trait::async_trait;
use tracing::debug;

use super::error::TransportError;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single-round-trip access to a node. No retries, no timeouts beyond what
/// the implementation's client applies by default.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// `GET {node}{path}`.
    async fn get(&self, path: &str) -> Result<TransportResponse, TransportError>;

    /// `PUT {node}{path}` with `body` sent as `content_type`.
    async fn put(
        &self,
        path: &str,
        body: String,
        content_type: &str,
    ) -> Result<TransportResponse, TransportError>;
}

/// [`NodeTransport`] over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// `base_url` is the node root, e.g. `https://node.example:3001`. A
    /// trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read(
        url: &str,
        response: reqwest::Response,
    ) -> Result<TransportResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        debug!(url, status, bytes = body.len(), "node response");
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<TransportResponse, TransportError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Self::read(&url, response).await
    }

    async fn put(
        &self,
        path: &str,
        body: String,
        content_type: &str,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url(path);
        debug!(url = %url, content_type, bytes = body.len(), "PUT");
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Self::read(&url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:3000/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000");
        assert_eq!(
            transport.url("/network/properties"),
            "http://localhost:3000/network/properties"
        );
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(202, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(503, "").is_success());
    }

    #[tokio::test]
    async fn unreachable_node_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let transport = HttpTransport::new("http://127.0.0.1:9").unwrap();
        let err = transport.get("/network/properties").await.unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }
}

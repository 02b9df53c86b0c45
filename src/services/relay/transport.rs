//! Outbound delivery of rendered payloads.
//!
//! The transport is a trait so the relay flow can run against an in-memory
//! destination in tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap};

use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::models::Destination;

/// What the destination answered, handed back to the webhook caller as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub duration_ms: u64,
}

/// Delivers a JSON payload to one destination.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Posts `payload` to the destination URL with `query` appended.
    ///
    /// A non-2xx answer is still `Ok`; only failing to get an answer at all
    /// is an error.
    async fn deliver(
        &self,
        destination: &Destination,
        query: Option<&str>,
        payload: Vec<u8>,
    ) -> AppResult<RelayResponse>;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}

/// HTTP transport backed by the shared client.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    timeout: Duration,
}

impl HttpRelayTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn deliver(
        &self,
        destination: &Destination,
        query: Option<&str>,
        payload: Vec<u8>,
    ) -> AppResult<RelayResponse> {
        let start = Instant::now();
        let url = append_query(&destination.url, query.unwrap_or_default());

        let response = HTTP_CLIENT
            .post(&url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                destination: destination.name.clone(),
                source: e.into(),
            })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream {
                destination: destination.name.clone(),
                source: e.into(),
            })?
            .to_vec();

        Ok(RelayResponse {
            status,
            headers,
            body,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Appends a raw query string, joining with `&` when the URL already has one.
pub fn append_query(base: &str, query: &str) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("https://h/hook", ""), "https://h/hook");
        assert_eq!(append_query("https://h/hook", "stream=dev"), "https://h/hook?stream=dev");
        assert_eq!(
            append_query("https://h/hook?api_key=k", "stream=dev&topic=x"),
            "https://h/hook?api_key=k&stream=dev&topic=x"
        );
    }

    #[tokio::test]
    async fn test_unreachable_destination_is_upstream_error() {
        let transport = HttpRelayTransport::new(Duration::from_secs(2));
        let destination = Destination::new(
            crate::models::DestinationKind::Zulip,
            "/zulip",
            "http://127.0.0.1:1/unreachable",
        );

        let err = transport
            .deliver(&destination, None, b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { .. }));
    }
}

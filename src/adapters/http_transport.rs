//! Reqwest-based streaming transport.
//!
//! Posts a chat-messages request and forwards the SSE body to the sink one
//! complete line at a time.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::models::QueryRequest;
use crate::sse::LineBuffer;
use crate::traits::{RawLineSink, StreamingTransport, TransportResult};

/// Timeout for the reachability probe.
pub const CONNECTION_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Streaming transport over HTTP.
///
/// # Example
///
/// ```ignore
/// use dify_stream::adapters::HttpTransport;
///
/// let transport = HttpTransport::new(ClientConfig::from_env()?)?;
/// let reachable = transport.test_connection(&CancellationToken::new()).await;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a transport whose client applies the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Build a transport around an existing client.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl StreamingTransport for HttpTransport {
    async fn send_streaming(
        &self,
        request: &QueryRequest,
        on_chunk: &mut RawLineSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<TransportResult, TransportError> {
        debug!("POST {}", self.config.api_url);
        let send = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .json(&request.to_wire_body())
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            response = send => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                text = response.text() => text.unwrap_or_default(),
            };
            warn!("Backend returned HTTP {}", status.as_u16());
            return Ok(TransportResult::failed(
                format!("HTTP {}: {}", status.as_u16(), body),
                body,
            ));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = LineBuffer::new();
        let mut full_body = String::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                next = stream.next() => next,
            };
            match next {
                Some(Ok(bytes)) => {
                    for mut line in buffer.push_bytes(&bytes) {
                        line.push('\n');
                        full_body.push_str(&line);
                        on_chunk(&line);
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }

        if let Some(tail) = buffer.finish() {
            full_body.push_str(&tail);
            on_chunk(&tail);
        }

        Ok(TransportResult::succeeded(full_body))
    }

    async fn test_connection(&self, cancel: &CancellationToken) -> bool {
        let probe = self
            .client
            .get(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .timeout(CONNECTION_TEST_TIMEOUT)
            .send();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            result = probe => result,
        };

        match result {
            Ok(response) => {
                let status = response.status();
                status.is_success() || status == StatusCode::UNAUTHORIZED
            }
            Err(e) => {
                debug!("Connection test failed: {}", e);
                false
            }
        }
    }

    fn configuration(&self) -> ClientConfig {
        self.config.clone()
    }
}

//! reqwest-backed transport

use super::{ByteStream, Result, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    /// Whole-request timeout, `None` leaves large downloads unbounded
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            user_agent: concat!("tripfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP transport shared by every download task
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_redirect() {
        TransportError::TooManyRedirects
    } else if e.is_builder() {
        TransportError::InvalidUrl(e.to_string())
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// GET `url` and hand back the body once the status line is in
    ///
    /// Any non-2xx status is a [`TransportError::Status`], so the task fails
    /// and no file is created. Plain HTTP clients that ignore the status
    /// would instead store the error page and report success.
    async fn get(&self, url: &str) -> Result<Box<dyn ByteStream>> {
        debug!(url, "Starting download");

        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        debug!(url, content_length = ?response.content_length(), "Response headers received");

        Ok(Box::new(ResponseStream { response }))
    }
}

struct ResponseStream {
    response: Response,
}

#[async_trait]
impl ByteStream for ResponseStream {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        self.response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Body(e.to_string())
            }
        })
    }
}

//! Transport collaborator: "GET by URL" returning a chunked byte stream
//!
//! The pipeline only sees the [`Transport`] and [`ByteStream`] traits.
//! [`HttpTransport`] is the production implementation on top of reqwest,
//! [`MockTransport`] serves scripted bodies and errors for tests.

mod http;
mod mock;

pub use http::{HttpConfig, HttpTransport};
pub use mock::{MemoryStream, MockTransport};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("HTTP {code}: {reason}")]
    Status { code: u16, reason: String },

    #[error("Failed to read body: {0}")]
    Body(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Response body consumed chunk by chunk
///
/// Dropping the stream releases the underlying connection.
#[async_trait]
pub trait ByteStream: Send {
    /// Next chunk of the body, `None` once the body is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}

/// Issues exactly one GET per call
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Box<dyn ByteStream>>;
}

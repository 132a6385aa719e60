//! In-process transport with scripted responses

use super::{ByteStream, Result, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};

/// Scripted body: chunks, optionally followed by a read error
#[derive(Debug, Clone)]
struct Script {
    chunks: Vec<Bytes>,
    fail_after: bool,
}

/// Mock transport for tests
///
/// Bodies registered for an exact URL win over the fallback. A URL with
/// neither fails with [`TransportError::RequestFailed`].
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    bodies: HashMap<String, Script>,
    fallback: Option<Script>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every URL answers with `body`
    pub fn always(body: impl Into<Bytes>) -> Self {
        Self {
            bodies: HashMap::new(),
            fallback: Some(Script {
                chunks: vec![body.into()],
                fail_after: false,
            }),
        }
    }

    /// Every URL fails
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.with_chunks(url, vec![body.into()])
    }

    /// Serve `chunks` one `next_chunk` call at a time
    pub fn with_chunks(mut self, url: impl Into<String>, chunks: Vec<Bytes>) -> Self {
        self.bodies.insert(
            url.into(),
            Script {
                chunks,
                fail_after: false,
            },
        );
        self
    }

    /// Serve `chunks`, then fail the body read with [`TransportError::Body`]
    pub fn with_error_after(mut self, url: impl Into<String>, chunks: Vec<Bytes>) -> Self {
        self.bodies.insert(
            url.into(),
            Script {
                chunks,
                fail_after: true,
            },
        );
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Box<dyn ByteStream>> {
        let script = self
            .bodies
            .get(url)
            .or(self.fallback.as_ref())
            .ok_or_else(|| TransportError::RequestFailed(format!("no mock response for {}", url)))?;

        tracing::debug!(url, chunks = script.chunks.len(), "Mock response");

        let mut stream = MemoryStream::new(script.chunks.clone());
        stream.fail_after = script.fail_after;
        Ok(Box::new(stream))
    }
}

/// Body held in memory
#[derive(Debug, Default)]
pub struct MemoryStream {
    chunks: VecDeque<Bytes>,
    fail_after: bool,
}

impl MemoryStream {
    pub fn new(chunks: impl IntoIterator<Item = Bytes>) -> Self {
        Self {
            chunks: chunks.into_iter().collect(),
            fail_after: false,
        }
    }
}

#[async_trait]
impl ByteStream for MemoryStream {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        match self.chunks.pop_front() {
            Some(chunk) => Ok(Some(chunk)),
            None if self.fail_after => Err(TransportError::Body("connection reset".to_string())),
            None => Ok(None),
        }
    }
}

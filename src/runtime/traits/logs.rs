// ABOUTME: Log operations trait for container runtimes.
// ABOUTME: Stream raw container log output with tail and stream selection.

use super::sealed::Sealed;
use crate::types::ContainerId;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Stream of log chunks as the runtime delivers them.
pub type LogChunkStream = Pin<Box<dyn Stream<Item = Result<LogChunk, LogError>> + Send>>;

/// Log streaming operations.
#[async_trait]
pub trait LogOps: Sealed + Send + Sync {
    /// Stream logs from a container.
    ///
    /// The runtime may only report an unknown container once the stream is
    /// polled, so callers must treat the first item as part of the request.
    async fn container_logs(
        &self,
        id: &ContainerId,
        opts: &LogOptions,
    ) -> Result<LogChunkStream, LogError>;
}

/// Options for log streaming.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Include stdout.
    pub stdout: bool,
    /// Include stderr.
    pub stderr: bool,
    /// Number of lines to show from the end (`None` = all).
    pub tail: Option<u64>,
}

impl LogOptions {
    /// Create options for the last N lines of stdout and stderr.
    pub fn tail(n: u64) -> Self {
        Self {
            stdout: true,
            stderr: true,
            tail: Some(n),
        }
    }

    /// Create options for the whole log of stdout and stderr.
    pub fn all() -> Self {
        Self {
            stdout: true,
            stderr: true,
            tail: None,
        }
    }
}

/// A frame of log output.
#[derive(Debug, Clone)]
pub struct LogChunk {
    /// Which stream produced the bytes.
    pub stream: LogStream,
    /// Raw payload, with the multiplexing header already removed.
    pub data: Bytes,
}

/// Log stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

/// Errors from log operations, displayed as the runtime reported them.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("{0}")]
    ContainerNotFound(String),

    #[error("{0}")]
    StreamError(String),

    #[error("{0}")]
    Runtime(String),
}

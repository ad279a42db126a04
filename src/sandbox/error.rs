// ABOUTME: Error type of the sandbox façade.
// ABOUTME: Separates caller mistakes from runtime failures, keeping runtime text intact.

use crate::runtime::{ContainerError, ImageError, LogError};
use std::path::PathBuf;

/// Errors returned by sandbox operations.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The request is malformed; nothing was sent to the runtime.
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Logs(#[from] LogError),

    #[error("failed to prepare config directory {}: {source}", path.display())]
    ConfigDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SandboxError {
    /// Whether the caller, not the runtime, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SandboxError::InvalidRequest(_))
    }
}

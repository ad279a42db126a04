// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: Pull images so that containers can be created from them.

use super::sealed::Sealed;
use crate::types::ImageRef;
use async_trait::async_trait;

/// Image operations.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Pull an image, returning once the runtime reports the pull finished.
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError>;
}

/// Errors from image operations, displayed as the runtime reported them.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PullFailed(String),
}

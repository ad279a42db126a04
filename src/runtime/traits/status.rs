// ABOUTME: Startup check of the container runtime daemon.
// ABOUTME: Reports which daemon answers and the API version both sides agreed on.

use super::sealed::Sealed;
use async_trait::async_trait;

/// What the daemon says about itself.
#[async_trait]
pub trait RuntimeStatus: Sealed + Send + Sync {
    /// Ask the daemon for its version. Fails when nothing answers.
    async fn version(&self) -> Result<RuntimeVersion, RuntimeUnreachable>;
}

/// Daemon identity, logged once when the server starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersion {
    /// `docker` or `podman`.
    pub name: String,
    /// Server version string (`27.3.1`, `5.2.0`).
    pub version: String,
    /// API version the client speaks after negotiation.
    pub api_version: String,
    pub os: String,
    pub arch: String,
}

/// The daemon did not answer.
#[derive(Debug, thiserror::Error)]
#[error("cannot reach container runtime: {0}")]
pub struct RuntimeUnreachable(pub String);

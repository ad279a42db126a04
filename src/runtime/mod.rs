// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Capability traits, the bollard client, daemon detection and errors.

mod bollard;
mod detection;
mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local, resolve_runtime};
pub use error::RuntimeError;
pub use traits::{
    ContainerConfig, ContainerDetails, ContainerError, ContainerOps, ContainerState,
    ContainerSummary, FullRuntime, ImageError, ImageOps, LogChunk, LogChunkStream, LogError,
    LogOps, LogOptions, LogStream, PortMapping, PortSummary, RestartPolicyConfig, RuntimeStatus,
    RuntimeUnreachable, RuntimeVersion, VolumeMount,
};
pub use types::{RuntimeConfig, RuntimeEndpoint, RuntimeInfo, RuntimeType};

/// Resolve the configured runtime, connect to it and agree on an API version.
///
/// Version negotiation is the first request sent to the daemon, so a daemon
/// that does not answer fails here.
pub async fn connect(config: &RuntimeConfig) -> Result<BollardRuntime, RuntimeError> {
    let info = resolve_runtime(config)?;
    tracing::debug!(
        runtime = %info.runtime_type,
        endpoint = %info.endpoint,
        "connecting to container runtime"
    );

    let runtime = BollardRuntime::connect(&info, config.timeout)?
        .negotiate_version()
        .await?;
    Ok(runtime)
}

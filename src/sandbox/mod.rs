// ABOUTME: Container lifecycle façade for sandboxed desktop containers.
// ABOUTME: Turns create/list/start/stop/remove/logs requests into runtime calls.

mod error;
mod info;
pub mod policy;
mod request;

pub use error::SandboxError;
pub use info::ContainerInfo;
pub use request::{ContainerRequest, CreatedContainer, LogTail};

use crate::runtime::{ContainerConfig, FullRuntime, LogOptions, RestartPolicyConfig, VolumeMount};
use crate::types::{ContainerId, ImageRef};
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, future};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Host-side settings of the façade.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxSettings {
    /// Directory holding each container's `<name>-config` bind mount source.
    pub config_root: PathBuf,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            config_root: PathBuf::from("/tmp"),
        }
    }
}

/// Stateless adapter between API requests and a container runtime.
///
/// Holds no container state of its own: every operation is a fresh call to
/// the runtime, so changes made by other clients are always visible. Clones
/// share the same runtime handle.
pub struct Sandbox<R> {
    runtime: Arc<R>,
    settings: Arc<SandboxSettings>,
}

impl<R> Clone for Sandbox<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<R: FullRuntime> Sandbox<R> {
    pub fn new(runtime: R, settings: SandboxSettings) -> Self {
        Self {
            runtime: Arc::new(runtime),
            settings: Arc::new(settings),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Build the runtime configuration for a request without side effects.
    pub fn container_config(
        &self,
        request: &ContainerRequest,
    ) -> Result<ContainerConfig, SandboxError> {
        let image = resolve_image(request.image.as_deref())?;

        for key in request.environment.keys() {
            policy::validate_env_key(key).map_err(SandboxError::InvalidRequest)?;
        }
        let env = policy::merge_env(&request.environment);

        let port = policy::sandbox_port(&request.ports).map_err(SandboxError::InvalidRequest)?;

        let config_dir = policy::host_config_dir(&self.settings.config_root, &request.name);

        Ok(ContainerConfig {
            name: request.name.clone(),
            image,
            env,
            ports: vec![port],
            volumes: vec![VolumeMount {
                source: config_dir.to_string_lossy().into_owned(),
                target: policy::CONFIG_MOUNT_TARGET.to_string(),
                read_only: false,
            }],
            restart_policy: RestartPolicyConfig::UnlessStopped,
            security_opt: vec![policy::SECURITY_OPT.to_string()],
            shm_size: Some(policy::SHM_SIZE),
        })
    }

    /// Pull the image and create (but not start) a sandbox container.
    ///
    /// Nothing is rolled back on failure: a pulled image stays cached and a
    /// created config directory stays in place for the next attempt.
    pub async fn create(
        &self,
        request: &ContainerRequest,
    ) -> Result<CreatedContainer, SandboxError> {
        let config = self.container_config(request)?;

        tracing::info!(container = %config.name, image = %config.image, "pulling image");
        self.runtime.pull_image(&config.image).await?;

        let config_dir = policy::host_config_dir(&self.settings.config_root, &config.name);
        tokio::fs::create_dir_all(&config_dir)
            .await
            .map_err(|source| SandboxError::ConfigDir {
                path: config_dir.clone(),
                source,
            })?;

        let id = self.runtime.create_container(&config).await?;
        tracing::info!(container = %config.name, id = %id.short(), "container created");

        Ok(CreatedContainer {
            id,
            message: "Container created successfully".to_string(),
        })
    }

    /// All containers the runtime knows about, in the runtime's order.
    pub async fn list(&self) -> Result<Vec<ContainerInfo>, SandboxError> {
        let containers = self.runtime.list_containers().await?;

        Ok(containers.iter().map(ContainerInfo::from).collect())
    }

    pub async fn start(&self, id: &ContainerId) -> Result<(), SandboxError> {
        self.runtime.start_container(id).await?;
        tracing::info!(id = %id, "container started");
        Ok(())
    }

    pub async fn stop(&self, id: &ContainerId) -> Result<(), SandboxError> {
        self.runtime
            .stop_container(id, policy::STOP_TIMEOUT)
            .await?;
        tracing::info!(id = %id, "container stopped");
        Ok(())
    }

    /// Remove a container, killing it first if it is still running.
    pub async fn remove(&self, id: &ContainerId) -> Result<(), SandboxError> {
        self.runtime.remove_container(id, true).await?;
        tracing::info!(id = %id, "container removed");
        Ok(())
    }

    /// Combined stdout and stderr of a container.
    ///
    /// The first chunk is awaited here so that an unknown container or an
    /// unreachable runtime is reported as an error rather than as an empty
    /// log. Failures after that end the stream early.
    pub async fn logs(
        &self,
        id: &ContainerId,
        tail: LogTail,
    ) -> Result<BoxStream<'static, Bytes>, SandboxError> {
        let opts = match tail {
            LogTail::Lines(n) => LogOptions::tail(n),
            LogTail::All => LogOptions::all(),
        };
        tracing::debug!(id = %id, %tail, "fetching logs");

        let mut logs = self.runtime.container_logs(id, &opts).await?;

        let first = match logs.next().await {
            Some(Ok(chunk)) => Some(chunk.data),
            Some(Err(e)) => return Err(e.into()),
            None => None,
        };

        let container = id.to_string();
        let rest = logs.scan((), move |_, item| {
            future::ready(match item {
                Ok(chunk) => Some(chunk.data),
                Err(e) => {
                    tracing::warn!(id = %container, error = %e, "log stream ended early");
                    None
                }
            })
        });

        Ok(stream::iter(first).chain(rest).boxed())
    }
}

fn resolve_image(image: Option<&str>) -> Result<ImageRef, SandboxError> {
    let reference = image
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(policy::DEFAULT_IMAGE);

    ImageRef::parse(reference).map_err(|e| SandboxError::InvalidRequest(e.to_string()))
}

// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Talks to Docker or Podman over a unix socket or TCP via the Docker-compatible API.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    ContainerConfig, ContainerDetails, ContainerError, ContainerOps, ContainerState,
    ContainerSummary, ImageError, ImageOps, LogChunk, LogChunkStream, LogError, LogOps,
    LogOptions, LogStream, PortSummary, RestartPolicyConfig, RuntimeStatus, RuntimeUnreachable,
    RuntimeVersion,
};
use crate::runtime::types::{RuntimeEndpoint, RuntimeInfo, RuntimeType};
use crate::types::{ContainerId, ImageRef};
use async_trait::async_trait;
use bollard::container::LogOutput;
use bollard::errors::Error;
use bollard::models::{
    ContainerCreateBody, ContainerStateStatusEnum, HostConfig, Mount, MountTypeEnum, PortBinding,
    RestartPolicy, RestartPolicyNameEnum,
};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, InspectContainerOptions, ListContainersOptions,
    LogsOptions, RemoveContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::{API_DEFAULT_VERSION, Docker};
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

/// The daemon's own text for a failed call.
///
/// Falls back to the client's description when the daemon sent no body, or
/// when the request never reached it.
fn runtime_text(e: &Error) -> String {
    match e {
        Error::DockerResponseServerError { message, .. } if !message.trim().is_empty() => {
            message.trim_end().to_string()
        }
        Error::DockerStreamError { error } => error.clone(),
        _ => e.to_string(),
    }
}

fn status_of(e: &Error) -> Option<u16> {
    match e {
        Error::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

fn pull_error(e: Error) -> ImageError {
    match status_of(&e) {
        Some(404) => ImageError::NotFound(runtime_text(&e)),
        _ => ImageError::PullFailed(runtime_text(&e)),
    }
}

/// On create, 404 is about the image and 409 about the name.
fn create_error(e: Error) -> ContainerError {
    match status_of(&e) {
        Some(404) => ContainerError::ImageNotFound(runtime_text(&e)),
        Some(409) => ContainerError::AlreadyExists(runtime_text(&e)),
        _ => container_error(e),
    }
}

fn container_error(e: Error) -> ContainerError {
    match status_of(&e) {
        Some(404) => ContainerError::NotFound(runtime_text(&e)),
        Some(409) => ContainerError::Conflict(runtime_text(&e)),
        _ => ContainerError::Runtime(runtime_text(&e)),
    }
}

fn log_error(e: Error) -> LogError {
    match status_of(&e) {
        Some(404) => LogError::ContainerNotFound(runtime_text(&e)),
        Some(_) => LogError::Runtime(runtime_text(&e)),
        None => LogError::StreamError(runtime_text(&e)),
    }
}

/// Split `KEY=VALUE` entries as the runtime stores them.
fn parse_env(entries: Vec<String>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (entry, String::new()),
        })
        .collect()
}

/// Parse `3000/tcp` into its port number.
fn container_port_of(key: &str) -> Option<u16> {
    key.split('/').next().and_then(|p| p.parse().ok())
}

/// Container runtime backed by a bollard client.
///
/// One instance serves every HTTP handler: each call is its own request to
/// the daemon.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardRuntime {
    /// Build a client for the resolved endpoint.
    ///
    /// No request is sent yet; see [`BollardRuntime::negotiate_version`].
    pub fn connect(info: &RuntimeInfo, timeout: Duration) -> Result<Self, RuntimeUnreachable> {
        let client = match &info.endpoint {
            RuntimeEndpoint::Unix(path) => {
                Docker::connect_with_unix(path, timeout.as_secs(), API_DEFAULT_VERSION)
            }
            RuntimeEndpoint::Http(address) => {
                Docker::connect_with_http(address, timeout.as_secs(), API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| RuntimeUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            runtime_type: info.runtime_type,
        })
    }

    /// Settle on the highest API version both the client and the daemon
    /// speak. Older daemons reject requests made with a newer version.
    pub async fn negotiate_version(self) -> Result<Self, RuntimeUnreachable> {
        let client = self
            .client
            .negotiate_version()
            .await
            .map_err(|e| RuntimeUnreachable(runtime_text(&e)))?;
        tracing::debug!(api_version = %client.client_version(), "negotiated API version");

        Ok(Self {
            client,
            runtime_type: self.runtime_type,
        })
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }
}

impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeStatus for BollardRuntime {
    async fn version(&self) -> Result<RuntimeVersion, RuntimeUnreachable> {
        let version = self
            .client
            .version()
            .await
            .map_err(|e| RuntimeUnreachable(runtime_text(&e)))?;

        Ok(RuntimeVersion {
            name: self.runtime_type.to_string(),
            version: version.version.unwrap_or_default(),
            api_version: self.client.client_version().to_string(),
            os: version.os.unwrap_or_default(),
            arch: version.arch.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image = reference.to_string();
        let opts = CreateImageOptions {
            from_image: Some(image.clone()),
            ..Default::default()
        };

        // The pull is done when the progress stream ends.
        let mut progress = self.client.create_image(Some(opts), None, None);
        while let Some(update) = progress.next().await {
            let update = update.map_err(pull_error)?;
            if let Some(status) = update.status {
                tracing::trace!(%image, %status, "pull progress");
            }
        }

        Ok(())
    }
}

fn restart_policy(policy: RestartPolicyConfig) -> RestartPolicy {
    RestartPolicy {
        name: Some(match policy {
            RestartPolicyConfig::No => RestartPolicyNameEnum::NO,
            RestartPolicyConfig::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
        }),
        maximum_retry_count: None,
    }
}

fn host_config(config: &ContainerConfig) -> HostConfig {
    let mounts: Vec<Mount> = config
        .volumes
        .iter()
        .map(|m| Mount {
            source: Some(m.source.clone()),
            target: Some(m.target.clone()),
            typ: Some(MountTypeEnum::BIND),
            read_only: Some(m.read_only),
            ..Default::default()
        })
        .collect();

    let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = config
        .ports
        .iter()
        .filter_map(|port| {
            let host_port = port.host_port?;
            Some((
                port.key(),
                Some(vec![PortBinding {
                    host_ip: None,
                    host_port: Some(host_port.to_string()),
                }]),
            ))
        })
        .collect();

    HostConfig {
        restart_policy: Some(restart_policy(config.restart_policy)),
        shm_size: config.shm_size.and_then(|s| i64::try_from(s).ok()),
        security_opt: (!config.security_opt.is_empty()).then(|| config.security_opt.clone()),
        mounts: (!mounts.is_empty()).then_some(mounts),
        port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
        ..Default::default()
    }
}

fn container_state(status: Option<ContainerStateStatusEnum>) -> ContainerState {
    match status {
        Some(ContainerStateStatusEnum::CREATED) => ContainerState::Created,
        Some(ContainerStateStatusEnum::RUNNING) => ContainerState::Running,
        Some(ContainerStateStatusEnum::PAUSED) => ContainerState::Paused,
        Some(ContainerStateStatusEnum::RESTARTING) => ContainerState::Restarting,
        Some(ContainerStateStatusEnum::REMOVING) => ContainerState::Removing,
        Some(ContainerStateStatusEnum::DEAD) => ContainerState::Dead,
        _ => ContainerState::Exited,
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let env: Vec<String> = config
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let exposed_ports: Vec<String> = config.ports.iter().map(|p| p.key()).collect();

        let body = ContainerCreateBody {
            image: Some(config.image.to_string()),
            env: (!env.is_empty()).then_some(env),
            exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
            host_config: Some(host_config(config)),
            ..Default::default()
        };
        let opts = CreateContainerOptions {
            name: Some(config.name.to_string()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(create_error)?;

        for warning in &response.warnings {
            tracing::warn!(container = %config.name, %warning, "runtime warning on create");
        }

        Ok(ContainerId::new(response.id))
    }

    /// Starting a running container is a no-op: the daemon answers
    /// 304 Not Modified and the client treats that as success.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(container_error)
    }

    /// Stopping a stopped container is a no-op, as with start.
    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        let opts = StopContainerOptions {
            t: Some(i32::try_from(timeout.as_secs()).unwrap_or(i32::MAX)),
            signal: None,
        };

        self.client
            .stop_container(id.as_str(), Some(opts))
            .await
            .map_err(container_error)
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(container_error)
    }

    async fn inspect_container(
        &self,
        id: &ContainerId,
    ) -> Result<ContainerDetails, ContainerError> {
        let details = self
            .client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(container_error)?;

        let mut published_ports: Vec<(u16, u16)> = details
            .network_settings
            .and_then(|n| n.ports)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, bindings)| {
                let container_port = container_port_of(&key)?;
                let host_port = bindings?
                    .into_iter()
                    .find_map(|b| b.host_port.and_then(|p| p.parse::<u16>().ok()))?;
                Some((container_port, host_port))
            })
            .collect();
        published_ports.sort_unstable();

        let host_config = details.host_config.unwrap_or_default();

        Ok(ContainerDetails {
            id: ContainerId::new(details.id.unwrap_or_else(|| id.to_string())),
            name: details
                .name
                .unwrap_or_default()
                .trim_start_matches('/')
                .to_string(),
            state: container_state(details.state.and_then(|s| s.status)),
            env: parse_env(details.config.and_then(|c| c.env).unwrap_or_default()),
            security_opt: host_config.security_opt.unwrap_or_default(),
            shm_size: host_config.shm_size.and_then(|s| u64::try_from(s).ok()),
            published_ports,
        })
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ContainerError> {
        let opts = ListContainersOptions {
            all: true,
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(container_error)?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: ContainerId::new(c.id.unwrap_or_default()),
                names: c.names.unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                state: c.state.map(|s| s.to_string()).unwrap_or_default(),
                status: c.status.unwrap_or_default(),
                ports: c
                    .ports
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| PortSummary {
                        private_port: p.private_port,
                        public_port: p.public_port,
                    })
                    .collect(),
            })
            .collect())
    }
}

#[async_trait]
impl LogOps for BollardRuntime {
    async fn container_logs(
        &self,
        id: &ContainerId,
        opts: &LogOptions,
    ) -> Result<LogChunkStream, LogError> {
        let logs_opts = LogsOptions {
            stdout: opts.stdout,
            stderr: opts.stderr,
            tail: opts
                .tail
                .map_or_else(|| "all".to_string(), |n| n.to_string()),
            ..Default::default()
        };

        let chunks = self
            .client
            .logs(id.as_str(), Some(logs_opts))
            .map(|frame| {
                frame.map_err(log_error).map(|output| match output {
                    LogOutput::StdErr { message } => LogChunk {
                        stream: LogStream::Stderr,
                        data: message,
                    },
                    LogOutput::StdOut { message }
                    | LogOutput::StdIn { message }
                    | LogOutput::Console { message } => LogChunk {
                        stream: LogStream::Stdout,
                        data: message,
                    },
                })
            });

        Ok(Box::pin(chunks))
    }
}

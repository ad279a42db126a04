// ABOUTME: In-memory runtime for unit tests of the façade and the API.
// ABOUTME: Mimics the Docker daemon's responses for the operations we use.

use super::traits::sealed::Sealed;
use super::traits::{
    ContainerConfig, ContainerDetails, ContainerError, ContainerOps, ContainerState,
    ContainerSummary, ImageError, ImageOps, LogChunk, LogChunkStream, LogError, LogOps,
    LogOptions, LogStream, PortSummary, RuntimeStatus, RuntimeUnreachable, RuntimeVersion,
};
use crate::types::{ContainerId, ImageRef};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;

/// First port handed out for `HostPort: "0"` bindings.
pub const EPHEMERAL_PORT_START: u16 = 32768;

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: ContainerId,
    pub config: ContainerConfig,
    pub state: ContainerState,
    pub published: Vec<(u16, u16)>,
    pub log: Vec<(LogStream, String)>,
}

/// A runtime call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Pull(String),
    Create(String),
    List,
    Start(String),
    Stop(String, Duration),
    Remove(String, bool),
    Logs(String, Option<u64>),
}

#[derive(Default)]
struct State {
    containers: Vec<FakeContainer>,
    images: Vec<String>,
    missing_images: Vec<String>,
    calls: Vec<Call>,
    next_port: u16,
    next_id: u64,
    break_log_after: Option<usize>,
    unreachable: bool,
}

#[derive(Default)]
pub struct FakeRuntime {
    state: Mutex<State>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make pulls of `image` fail like an unknown repository.
    pub fn with_missing_image(self, image: &str) -> Self {
        self.lock().missing_images.push(image.to_string());
        self
    }

    /// Make every call fail like a daemon that is not listening.
    pub fn unreachable(self) -> Self {
        self.lock().unreachable = true;
        self
    }

    /// End log streams with an error after `chunks` chunks.
    pub fn break_logs_after(self, chunks: usize) -> Self {
        self.lock().break_log_after = Some(chunks);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn pulled(&self) -> Vec<String> {
        self.lock().images.clone()
    }

    pub fn container(&self, id: &ContainerId) -> Option<FakeContainer> {
        self.lock().containers.iter().find(|c| &c.id == id).cloned()
    }

    /// Append a log line to a container, as if the process printed it.
    pub fn push_log(&self, id: &ContainerId, stream: LogStream, line: &str) {
        let mut state = self.lock();
        if let Some(c) = state.containers.iter_mut().find(|c| &c.id == id) {
            c.log.push((stream, format!("{}\n", line)));
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }
}

impl State {
    fn check_reachable(&self) -> Result<(), String> {
        if self.unreachable {
            return Err("error trying to connect: No such file or directory (os error 2)".into());
        }
        Ok(())
    }

    /// Resolve an id the way the daemon does: full id, unique prefix, or name.
    fn find(&mut self, id: &ContainerId) -> Option<&mut FakeContainer> {
        let needle = id.as_str();
        self.containers.iter_mut().find(|c| {
            c.id.as_str().starts_with(needle) || c.config.name.as_str() == needle
        })
    }
}

fn no_such_container(id: &ContainerId) -> String {
    format!("No such container: {}", id)
}

impl Sealed for FakeRuntime {}

#[async_trait]
impl RuntimeStatus for FakeRuntime {
    async fn version(&self) -> Result<RuntimeVersion, RuntimeUnreachable> {
        self.lock().check_reachable().map_err(RuntimeUnreachable)?;
        Ok(RuntimeVersion {
            name: "fake".to_string(),
            version: "0.0.0".to_string(),
            api_version: "1.47".to_string(),
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
        })
    }
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image = reference.to_string();
        let mut state = self.lock();
        state.calls.push(Call::Pull(image.clone()));
        state.check_reachable().map_err(ImageError::PullFailed)?;

        if state.missing_images.contains(&image) {
            return Err(ImageError::NotFound(format!(
                "pull access denied for {}, repository does not exist or may require 'docker login'",
                reference.name()
            )));
        }
        if !state.images.contains(&image) {
            state.images.push(image);
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let mut state = self.lock();
        state.calls.push(Call::Create(config.name.to_string()));
        state.check_reachable().map_err(ContainerError::Runtime)?;

        if let Some(existing) = state.containers.iter().find(|c| c.config.name == config.name) {
            return Err(ContainerError::AlreadyExists(format!(
                "Conflict. The container name \"/{}\" is already in use by container \"{}\". \
                 You have to remove (or rename) that container to be able to reuse that name.",
                config.name, existing.id
            )));
        }
        if !state.images.contains(&config.image.to_string()) {
            return Err(ContainerError::ImageNotFound(format!(
                "No such image: {}",
                config.image
            )));
        }

        state.next_id += 1;
        let id = ContainerId::new(format!("{:0>64x}", 0xc0ffee_u64 * 1000 + state.next_id));
        state.containers.push(FakeContainer {
            id: id.clone(),
            config: config.clone(),
            state: ContainerState::Created,
            published: Vec::new(),
            log: Vec::new(),
        });
        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.lock();
        state.calls.push(Call::Start(id.to_string()));
        state.check_reachable().map_err(ContainerError::Runtime)?;

        let next_port = EPHEMERAL_PORT_START + state.next_port;
        let container = state
            .find(id)
            .ok_or_else(|| ContainerError::NotFound(no_such_container(id)))?;
        // 304 Not Modified, which the client reports as success.
        if container.state == ContainerState::Running {
            return Ok(());
        }

        let mut assigned = 0;
        container.published = container
            .config
            .ports
            .iter()
            .filter_map(|p| {
                let host = match p.host_port? {
                    0 => {
                        assigned += 1;
                        next_port + assigned - 1
                    }
                    port => port,
                };
                Some((p.container_port, host))
            })
            .collect();
        container.state = ContainerState::Running;
        state.next_port += assigned;
        Ok(())
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        let mut state = self.lock();
        state.calls.push(Call::Stop(id.to_string(), timeout));
        state.check_reachable().map_err(ContainerError::Runtime)?;

        let container = state
            .find(id)
            .ok_or_else(|| ContainerError::NotFound(no_such_container(id)))?;
        if container.state != ContainerState::Running {
            return Ok(());
        }
        container.state = ContainerState::Exited;
        container.published.clear();
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let mut state = self.lock();
        state.calls.push(Call::Remove(id.to_string(), force));
        state.check_reachable().map_err(ContainerError::Runtime)?;

        let container = state
            .find(id)
            .ok_or_else(|| ContainerError::NotFound(no_such_container(id)))?;
        if container.state == ContainerState::Running && !force {
            return Err(ContainerError::Conflict(format!(
                "cannot remove container \"/{}\": container is running: stop the container before removing or force remove",
                container.config.name
            )));
        }
        let full_id = container.id.clone();
        state.containers.retain(|c| c.id != full_id);
        Ok(())
    }

    async fn inspect_container(
        &self,
        id: &ContainerId,
    ) -> Result<ContainerDetails, ContainerError> {
        let mut state = self.lock();
        let container = state
            .find(id)
            .ok_or_else(|| ContainerError::NotFound(no_such_container(id)))?;
        Ok(ContainerDetails {
            id: container.id.clone(),
            name: container.config.name.to_string(),
            state: container.state,
            env: container.config.env.clone(),
            security_opt: container.config.security_opt.clone(),
            shm_size: container.config.shm_size,
            published_ports: container.published.clone(),
        })
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ContainerError> {
        let mut state = self.lock();
        state.calls.push(Call::List);
        state.check_reachable().map_err(ContainerError::Runtime)?;

        Ok(state
            .containers
            .iter()
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                names: vec![format!("/{}", c.config.name)],
                image: c.config.image.to_string(),
                state: format!("{:?}", c.state).to_lowercase(),
                status: String::new(),
                ports: c
                    .config
                    .ports
                    .iter()
                    .map(|p| PortSummary {
                        private_port: p.container_port,
                        public_port: c
                            .published
                            .iter()
                            .find(|(private, _)| *private == p.container_port)
                            .map(|(_, public)| *public),
                    })
                    .collect(),
            })
            .collect())
    }
}

#[async_trait]
impl LogOps for FakeRuntime {
    async fn container_logs(
        &self,
        id: &ContainerId,
        opts: &LogOptions,
    ) -> Result<LogChunkStream, LogError> {
        let mut state = self.lock();
        state.calls.push(Call::Logs(id.to_string(), opts.tail));
        let break_after = state.break_log_after;
        let unreachable = state.check_reachable().err();
        let found = state.find(id).map(|c| c.log.clone());

        // Like the daemon client, errors only show up once the stream is polled.
        let items: Vec<Result<LogChunk, LogError>> = match (unreachable, found) {
            (Some(e), _) => vec![Err(LogError::StreamError(e))],
            (None, None) => vec![Err(LogError::ContainerNotFound(no_such_container(id)))],
            (None, Some(log)) => {
                let selected: Vec<_> = log
                    .into_iter()
                    .filter(|(s, _)| match s {
                        LogStream::Stdout => opts.stdout,
                        LogStream::Stderr => opts.stderr,
                    })
                    .collect();
                let skip = match opts.tail {
                    Some(n) => selected.len().saturating_sub(n as usize),
                    None => 0,
                };
                let mut items: Vec<_> = selected
                    .into_iter()
                    .skip(skip)
                    .map(|(stream, line)| {
                        Ok(LogChunk {
                            stream,
                            data: Bytes::from(line),
                        })
                    })
                    .collect();
                if let Some(n) = break_after {
                    items.truncate(n);
                    items.push(Err(LogError::StreamError("connection reset".to_string())));
                }
                items
            }
        };

        Ok(Box::pin(futures::stream::iter(items)))
    }
}

// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: Create, start, stop, remove, inspect, and list containers.

use super::sealed::Sealed;
use super::shared_types::{ContainerConfig, ContainerDetails, PortSummary};
use crate::types::ContainerId;
use async_trait::async_trait;
use std::time::Duration;

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// Create a container from the given configuration.
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError>;

    /// Start a created container. Starting a running container succeeds
    /// without doing anything.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop a running container, killing it once `timeout` has elapsed.
    /// Stopping a stopped container succeeds without doing anything.
    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError>;

    /// Remove a container. With `force`, a running container is killed first.
    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;

    /// Get detailed information about a container.
    async fn inspect_container(&self, id: &ContainerId)
    -> Result<ContainerDetails, ContainerError>;

    /// Every container the runtime knows about, in any state, in the
    /// runtime's order.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ContainerError>;
}

/// Summary information about a container, as the runtime lists it.
#[derive(Debug, Clone)]
pub struct ContainerSummary {
    /// Full container ID.
    pub id: ContainerId,
    /// Names as reported by the runtime (Docker prefixes them with `/`).
    pub names: Vec<String>,
    /// Image used.
    pub image: String,
    /// Lifecycle state (`created`, `running`, `exited`, ...).
    pub state: String,
    /// Human readable status (`Up 2 minutes`).
    pub status: String,
    /// Ports, published or not.
    pub ports: Vec<PortSummary>,
}

/// Errors from container operations.
///
/// Each variant carries the runtime's message unchanged and displays as
/// exactly that text.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    ImageNotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Runtime(String),
}

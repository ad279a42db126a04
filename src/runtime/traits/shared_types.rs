// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ContainerConfig, ContainerDetails, and the port and mount types.

use crate::types::{ContainerId, ContainerName, ImageRef};

/// Configuration for creating a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Name for the container.
    pub name: ContainerName,
    /// Image to run.
    pub image: ImageRef,
    /// Environment variables in the order they are passed to the runtime.
    pub env: Vec<(String, String)>,
    /// Port mappings (host:container).
    pub ports: Vec<PortMapping>,
    /// Bind mounts.
    pub volumes: Vec<VolumeMount>,
    /// Restart policy.
    pub restart_policy: RestartPolicyConfig,
    /// Security options (`seccomp=unconfined`, ...).
    pub security_opt: Vec<String>,
    /// Size of `/dev/shm` in bytes.
    pub shm_size: Option<u64>,
}

/// Port mapping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    /// Host port. `Some(0)` asks the runtime to pick one, `None` only exposes.
    pub host_port: Option<u16>,
    /// TCP port inside the container.
    pub container_port: u16,
}

impl PortMapping {
    /// The `<port>/tcp` key the runtime uses for exposed ports.
    pub fn key(&self) -> String {
        format!("{}/tcp", self.container_port)
    }
}

/// Bind mount configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    /// Host path.
    pub source: String,
    /// Target path in container.
    pub target: String,
    /// Read-only flag.
    pub read_only: bool,
}

/// Restart policy configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartPolicyConfig {
    No,
    /// Restart after daemon restarts unless explicitly stopped.
    #[default]
    UnlessStopped,
}

/// A port as reported in a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    /// Port inside the container.
    pub private_port: u16,
    /// Port on the host, present only when published.
    pub public_port: Option<u16>,
}

/// Detailed information about a container.
#[derive(Debug, Clone)]
pub struct ContainerDetails {
    /// Container ID.
    pub id: ContainerId,
    /// Container name, without the runtime's leading `/`.
    pub name: String,
    /// Current state.
    pub state: ContainerState,
    /// Environment as the container was configured.
    pub env: Vec<(String, String)>,
    /// Security options from the host configuration.
    pub security_opt: Vec<String>,
    /// Size of `/dev/shm` in bytes.
    pub shm_size: Option<u64>,
    /// Host ports currently published, as (container port, host port).
    pub published_ports: Vec<(u16, u16)>,
}

impl ContainerDetails {
    /// Value of an environment variable, if set.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

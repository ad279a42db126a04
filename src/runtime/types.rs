// ABOUTME: Runtime type definitions for Docker and Podman.
// ABOUTME: Includes RuntimeType, the daemon endpoint, RuntimeInfo and the runtime config section.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// Where the daemon serves its API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEndpoint {
    /// Path of a unix socket.
    Unix(String),
    /// `tcp://host:port` or `http://host:port` of a daemon listening on TCP.
    Http(String),
}

impl RuntimeEndpoint {
    /// Parse a `DOCKER_HOST`-style address.
    ///
    /// `unix://` prefixes are stripped and a value without a scheme is taken
    /// as a socket path. Returns `None` for schemes the client cannot speak
    /// (`ssh://`, `npipe://`).
    pub fn parse(host: &str) -> Option<Self> {
        if let Some(path) = host.strip_prefix("unix://") {
            return Some(RuntimeEndpoint::Unix(path.to_string()));
        }
        if host.starts_with("tcp://") || host.starts_with("http://") {
            return Some(RuntimeEndpoint::Http(host.to_string()));
        }
        if host.contains("://") {
            return None;
        }
        Some(RuntimeEndpoint::Unix(host.to_string()))
    }
}

impl std::fmt::Display for RuntimeEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeEndpoint::Unix(path) => write!(f, "unix://{}", path),
            RuntimeEndpoint::Http(address) => write!(f, "{}", address),
        }
    }
}

/// Detected runtime information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// The type of runtime detected.
    pub runtime_type: RuntimeType,
    /// Where to reach it.
    pub endpoint: RuntimeEndpoint,
}

/// Runtime section of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Explicit runtime type (overrides auto-detection).
    #[serde(default)]
    pub runtime: Option<RuntimeType>,
    /// Explicit socket path or `DOCKER_HOST`-style address (overrides detection).
    #[serde(default)]
    pub socket: Option<String>,
    /// Per-request timeout of the runtime client.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            socket: None,
            timeout: default_timeout(),
        }
    }
}

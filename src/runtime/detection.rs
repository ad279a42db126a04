// ABOUTME: Runtime detection logic for the local system.
// ABOUTME: Honors DOCKER_HOST, then checks Podman sockets, then Docker.

use super::types::{RuntimeConfig, RuntimeEndpoint, RuntimeInfo, RuntimeType};
use std::path::Path;

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked DOCKER_HOST, Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("unsupported runtime address (expected unix://, tcp:// or http://): {0}")]
    UnsupportedHost(String),
}

/// Detect container runtime on the local system.
///
/// Detection order:
/// 1. `DOCKER_HOST` (`unix://`, `tcp://` or `http://`)
/// 2. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 3. Rootful Podman socket (`/run/podman/podman.sock`)
/// 4. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<RuntimeInfo, DetectionError> {
    if let Some(host) = std::env::var("DOCKER_HOST").ok().filter(|h| !h.is_empty()) {
        return from_address(&host);
    }

    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(unix(RuntimeType::Podman, rootless_socket));
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(unix(RuntimeType::Podman, ROOTFUL_PODMAN));
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(unix(RuntimeType::Docker, DOCKER_SOCKET));
    }

    Err(DetectionError::NoRuntimeFound)
}

/// Resolve the runtime to connect to.
///
/// Explicit values in `config` take precedence; anything left open falls back
/// to [`detect_local`].
pub fn resolve_runtime(config: &RuntimeConfig) -> Result<RuntimeInfo, DetectionError> {
    match (config.runtime, &config.socket) {
        (Some(runtime_type), Some(socket)) => Ok(RuntimeInfo {
            runtime_type,
            endpoint: parse_endpoint(socket)?,
        }),
        (Some(runtime_type), None) => Ok(unix(runtime_type, default_socket_path(runtime_type))),
        (None, Some(socket)) => from_address(socket),
        (None, None) => detect_local(),
    }
}

fn from_address(address: &str) -> Result<RuntimeInfo, DetectionError> {
    Ok(RuntimeInfo {
        runtime_type: runtime_type_for_address(address),
        endpoint: parse_endpoint(address)?,
    })
}

fn parse_endpoint(address: &str) -> Result<RuntimeEndpoint, DetectionError> {
    RuntimeEndpoint::parse(address)
        .ok_or_else(|| DetectionError::UnsupportedHost(address.to_string()))
}

fn unix(runtime_type: RuntimeType, socket_path: impl Into<String>) -> RuntimeInfo {
    RuntimeInfo {
        runtime_type,
        endpoint: RuntimeEndpoint::Unix(socket_path.into()),
    }
}

fn runtime_type_for_address(address: &str) -> RuntimeType {
    if address.contains("podman") {
        RuntimeType::Podman
    } else {
        RuntimeType::Docker
    }
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> &'static str {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET,
        RuntimeType::Podman => ROOTFUL_PODMAN,
    }
}

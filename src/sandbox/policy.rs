// ABOUTME: Fixed policy for sandbox containers: image, environment, ports, mounts.
// ABOUTME: Pure helpers that turn a request into runtime configuration pieces.

use crate::runtime::PortMapping;
use crate::types::ContainerName;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Image used when a request does not name one.
pub const DEFAULT_IMAGE: &str = "lscr.io/linuxserver/webtop:ubuntu-kde";

/// Port the desktop's web client listens on inside the container.
pub const SANDBOX_PORT: u16 = 3000;

/// Desktop sessions and browsers need far more than the runtime's 64 MiB.
pub const SHM_SIZE: u64 = 1024 * 1024 * 1024;

/// Grace period between the stop signal and the kill.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the image keeps its persistent home directory.
pub const CONFIG_MOUNT_TARGET: &str = "/config";

/// The desktop needs syscalls the default seccomp profile blocks.
pub const SECURITY_OPT: &str = "seccomp=unconfined";

/// Environment every sandbox starts with, before request overrides.
pub const DEFAULT_ENV: &[(&str, &str)] = &[
    ("PUID", "1000"),
    ("PGID", "1000"),
    ("TZ", "Etc/UTC"),
    ("SUBFOLDER", "/"),
    ("KEYBOARD", "en-us-qwerty"),
];

/// Merge request overrides into the default environment.
///
/// Defaults keep their position; an override of a default replaces its value
/// in place, other overrides follow in key order.
pub fn merge_env(overrides: &BTreeMap<String, String>) -> Vec<(String, String)> {
    let mut env: Vec<(String, String)> = DEFAULT_ENV
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for (key, value) in overrides {
        match env.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.clone(),
            None => env.push((key.clone(), value.clone())),
        }
    }

    env
}

/// Reject keys the runtime cannot represent as `KEY=VALUE`.
pub fn validate_env_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("environment variable name cannot be empty".to_string());
    }
    if key.contains('=') {
        return Err(format!("environment variable name cannot contain '=': {}", key));
    }
    Ok(())
}

/// Port mapping for the sandbox port.
///
/// Only the entry keyed by the sandbox port is consulted. A missing or blank
/// host port becomes `0`, which makes the runtime pick a free one.
pub fn sandbox_port(ports: &BTreeMap<String, String>) -> Result<PortMapping, String> {
    let requested = ports
        .get(&SANDBOX_PORT.to_string())
        .map(|p| p.trim())
        .filter(|p| !p.is_empty());

    let host_port = match requested {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| format!("invalid host port for {}: {}", SANDBOX_PORT, p))?,
        None => 0,
    };

    Ok(PortMapping {
        host_port: Some(host_port),
        container_port: SANDBOX_PORT,
    })
}

/// Host directory mounted as the container's config directory.
pub fn host_config_dir(root: &Path, name: &ContainerName) -> PathBuf {
    root.join(format!("{}-config", name))
}

/// Browser URL for a published sandbox port.
pub fn access_url(host_port: u16) -> String {
    format!("http://localhost:{}", host_port)
}

// ABOUTME: Request and acknowledgement shapes of the sandbox façade.
// ABOUTME: ContainerRequest, CreatedContainer and the log tail selector.

use crate::types::{ContainerId, ContainerName};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerRequest {
    /// Container name, also used for the host-side config directory.
    pub name: ContainerName,

    /// Image reference; absent or empty selects the default sandbox image.
    #[serde(default)]
    pub image: Option<String>,

    /// Environment overrides applied on top of the defaults.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub environment: BTreeMap<String, String>,

    /// Container port to host port. Only the sandbox port is consulted.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ports: BTreeMap<String, String>,
}

impl ContainerRequest {
    pub fn new(name: ContainerName) -> Self {
        Self {
            name,
            image: None,
            environment: BTreeMap::new(),
            ports: BTreeMap::new(),
        }
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn port(mut self, container_port: impl Into<String>, host_port: impl Into<String>) -> Self {
        self.ports.insert(container_port.into(), host_port.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedContainer {
    /// Full runtime-assigned id.
    pub id: ContainerId,
    pub message: String,
}

/// How much of a container's log to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTail {
    /// The last N lines.
    Lines(u64),
    /// The whole log.
    All,
}

impl LogTail {
    pub const DEFAULT_LINES: u64 = 100;
}

impl Default for LogTail {
    fn default() -> Self {
        LogTail::Lines(Self::DEFAULT_LINES)
    }
}

impl FromStr for LogTail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(LogTail::All),
            n => n
                .parse::<u64>()
                .map(LogTail::Lines)
                .map_err(|_| format!("invalid lines value: {}", s)),
        }
    }
}

impl fmt::Display for LogTail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTail::Lines(n) => write!(f, "{}", n),
            LogTail::All => write!(f, "all"),
        }
    }
}

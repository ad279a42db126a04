// ABOUTME: Configuration types and parsing for playground.yml.
// ABOUTME: Server address, runtime connection and sandbox host settings.

mod address;

pub use address::ListenAddress;

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use crate::sandbox::SandboxSettings;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "playground.yml";
pub const CONFIG_FILENAME_ALT: &str = "playground.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".playground/config.yml";

/// Server configuration. Every field has a default, so an absent file or an
/// empty document is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub address: ListenAddress,

    pub runtime: RuntimeConfig,

    pub sandbox: SandboxSettings,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document instead of treating it as {}.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or the defaults if none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}

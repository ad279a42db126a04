// ABOUTME: Application-wide error types for playground.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::config::ListenAddress;
use crate::runtime::RuntimeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to initialize sandbox: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: ListenAddress,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl Error {
    /// A suggestion printed under the error, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Runtime(e) => Some(e.hint()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ABOUTME: Container name validation matching the runtime's naming rule.
// ABOUTME: Names must match [a-zA-Z0-9][a-zA-Z0-9_.-]*.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name must start with a letter or digit")]
    InvalidStart,

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// A name accepted by the runtime for a new container.
///
/// The name also becomes part of a host path, so the character set doubles
/// as the guarantee that it never contains a path separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let mut chars = value.chars();

        match chars.next() {
            None => return Err(ContainerNameError::Empty),
            Some(c) if !c.is_ascii_alphanumeric() => return Err(ContainerNameError::InvalidStart),
            Some(_) => {}
        }

        for c in chars {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(ContainerNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ContainerName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContainerName::new(&s).map_err(de::Error::custom)
    }
}

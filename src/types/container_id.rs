// ABOUTME: Runtime-assigned container identifier.
// ABOUTME: Accepts full ids, short ids, or names as the runtime does.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the display form of a container id.
pub const SHORT_ID_LEN: usize = 12;

/// Identifier of a container as understood by the runtime.
///
/// The runtime resolves full ids, unique id prefixes and container names, so
/// no validation happens here; an unknown value is reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use = "IDs reference resources and should not be ignored"]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The first twelve characters, as `docker ps` prints them.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

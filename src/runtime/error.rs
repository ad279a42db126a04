// ABOUTME: Startup errors of the runtime connection, built with SNAFU.
// ABOUTME: Covers a daemon that cannot be located and one that does not answer.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeUnreachable;

/// Why the server could not get hold of a container runtime.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("{source}"))]
    Detection { source: DetectionError },

    #[snafu(display("{source}"))]
    Unreachable { source: RuntimeUnreachable },
}

impl RuntimeError {
    /// What the operator can do about it.
    pub fn hint(&self) -> &'static str {
        match self {
            RuntimeError::Detection {
                source: DetectionError::NoRuntimeFound,
            } => "start Docker or Podman, or point DOCKER_HOST at a running daemon",
            RuntimeError::Detection {
                source: DetectionError::UnsupportedHost(_),
            } => "use a unix:// socket or a tcp:// address for DOCKER_HOST or runtime.socket",
            RuntimeError::Unreachable { .. } => {
                "check that the daemon is running and that its socket is readable by this user"
            }
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<RuntimeUnreachable> for RuntimeError {
    fn from(source: RuntimeUnreachable) -> Self {
        RuntimeError::Unreachable { source }
    }
}

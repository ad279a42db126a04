// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, LogOps, RuntimeStatus and the FullRuntime bundle.

mod container;
mod image;
mod logs;
pub(crate) mod sealed;
mod shared_types;
mod status;

pub use container::{ContainerError, ContainerOps, ContainerSummary};
pub use image::{ImageError, ImageOps};
pub use logs::{LogChunk, LogChunkStream, LogError, LogOps, LogOptions, LogStream};
pub use shared_types::*;
pub use status::{RuntimeStatus, RuntimeUnreachable, RuntimeVersion};

/// Every capability the sandbox façade needs from a runtime.
pub trait FullRuntime: ImageOps + ContainerOps + LogOps + RuntimeStatus {}

impl<T> FullRuntime for T where T: ImageOps + ContainerOps + LogOps + RuntimeStatus {}

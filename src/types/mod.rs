// ABOUTME: Validated domain types shared by the façade and the runtime layer.
// ABOUTME: Container ids, container names, and image references.

mod container_id;
mod container_name;
mod image_ref;

pub use container_id::{ContainerId, SHORT_ID_LEN};
pub use container_name::{ContainerName, ContainerNameError};
pub use image_ref::{ImageRef, ParseImageRefError};

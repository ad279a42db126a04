// ABOUTME: Projection of runtime container listings into API responses.
// ABOUTME: Normalizes ids, names and published ports without touching the runtime.

use super::policy::{SANDBOX_PORT, access_url};
use crate::runtime::ContainerSummary;
use serde::Serialize;

/// A container as the API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    /// Short form of the runtime id.
    pub id: String,
    pub name: String,
    pub image: String,
    /// Lifecycle state reported by the runtime.
    pub status: String,
    /// Published ports as `host:container`.
    pub ports: Vec<String>,
    /// Browser URL, present when the sandbox port is published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&ContainerSummary> for ContainerInfo {
    fn from(summary: &ContainerSummary) -> Self {
        let name = summary
            .names
            .first()
            .map(|n| n.strip_prefix('/').unwrap_or(n).to_string())
            .unwrap_or_default();

        let status = if summary.state.is_empty() {
            summary.status.clone()
        } else {
            summary.state.clone()
        };

        let mut ports = Vec::new();
        let mut url = None;
        for port in &summary.ports {
            // Unpublished ports have no host side to report.
            let Some(public) = port.public_port.filter(|p| *p > 0) else {
                continue;
            };
            ports.push(format!("{}:{}", public, port.private_port));
            if port.private_port == SANDBOX_PORT {
                url = Some(access_url(public));
            }
        }

        Self {
            id: summary.id.short().to_string(),
            name,
            image: summary.image.clone(),
            status,
            ports,
            url,
        }
    }
}

// ABOUTME: Request handlers for the container endpoints.
// ABOUTME: Thin adapters from HTTP extractors to Sandbox operations.

use super::error::ApiError;
use crate::runtime::FullRuntime;
use crate::sandbox::{ContainerInfo, ContainerRequest, CreatedContainer, LogTail, Sandbox};
use crate::types::ContainerId;
use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

type Result<T> = std::result::Result<T, ApiError>;

/// Acknowledgement body of lifecycle operations.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    fn json(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Create a container.
pub async fn create_container<R: FullRuntime>(
    State(sandbox): State<Sandbox<R>>,
    body: std::result::Result<Json<ContainerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedContainer>)> {
    let Json(request) = body?;
    let created = sandbox.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List all containers, running or not.
pub async fn list_containers<R: FullRuntime>(
    State(sandbox): State<Sandbox<R>>,
) -> Result<Json<Vec<ContainerInfo>>> {
    Ok(Json(sandbox.list().await?))
}

pub async fn start_container<R: FullRuntime>(
    State(sandbox): State<Sandbox<R>>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    sandbox.start(&ContainerId::new(id)).await?;
    Ok(Message::json("Container started successfully"))
}

pub async fn stop_container<R: FullRuntime>(
    State(sandbox): State<Sandbox<R>>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    sandbox.stop(&ContainerId::new(id)).await?;
    Ok(Message::json("Container stopped successfully"))
}

pub async fn remove_container<R: FullRuntime>(
    State(sandbox): State<Sandbox<R>>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    sandbox.remove(&ContainerId::new(id)).await?;
    Ok(Message::json("Container removed successfully"))
}

/// Logs query parameters.
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Number of trailing lines, or "all".
    pub lines: Option<String>,
}

/// Stream a container's combined stdout and stderr as plain text.
pub async fn container_logs<R: FullRuntime>(
    State(sandbox): State<Sandbox<R>>,
    Path(id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Response> {
    let tail = match query.lines.as_deref().map(str::trim) {
        None | Some("") => LogTail::default(),
        Some(lines) => lines.parse::<LogTail>().map_err(ApiError::BadRequest)?,
    };

    let logs = sandbox.logs(&ContainerId::new(id), tail).await?;
    let body = Body::from_stream(logs.map(Ok::<_, Infallible>));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}

// ABOUTME: HTTP API server for the sandbox façade.
// ABOUTME: Builds the axum router under /api and runs it until shutdown.

mod error;
pub mod handlers;

pub use error::ApiError;

use crate::config::ListenAddress;
use crate::error::{Error, Result};
use crate::runtime::{FullRuntime, RuntimeStatus, RuntimeVersion};
use crate::sandbox::Sandbox;
use axum::Router;
use axum::routing::{delete, get, post};
use tokio::net::TcpListener;

/// Router exposing the container endpoints under `/api`.
pub fn router<R: FullRuntime + 'static>(sandbox: Sandbox<R>) -> Router {
    let api = Router::new()
        .route(
            "/containers",
            get(handlers::list_containers::<R>).post(handlers::create_container::<R>),
        )
        .route("/containers/{id}", delete(handlers::remove_container::<R>))
        .route("/containers/{id}/start", post(handlers::start_container::<R>))
        .route("/containers/{id}/stop", post(handlers::stop_container::<R>))
        .route("/containers/{id}/logs", get(handlers::container_logs::<R>))
        .with_state(sandbox);

    Router::new().nest("/api", api)
}

/// Bind `address` and serve the API until Ctrl-C or SIGTERM.
pub async fn serve<R: FullRuntime + 'static>(
    address: &ListenAddress,
    sandbox: Sandbox<R>,
) -> Result<()> {
    log_runtime_version(sandbox.runtime()).await;

    let listener = TcpListener::bind((address.host(), address.port()))
        .await
        .map_err(|source| Error::Bind {
            address: address.clone(),
            source,
        })?;
    let local = listener.local_addr().map_err(Error::Serve)?;
    tracing::info!(address = %local, "listening");

    axum::serve(listener, router(sandbox))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Serve)?;

    tracing::info!("server stopped");
    Ok(())
}

/// Log which daemon is serving requests.
async fn log_runtime_version<R: RuntimeStatus>(runtime: &R) -> Option<RuntimeVersion> {
    match runtime.version().await {
        Ok(version) => {
            tracing::info!(
                runtime = %version.name,
                version = %version.version,
                api_version = %version.api_version,
                os = %version.os,
                arch = %version.arch,
                "container runtime ready"
            );
            Some(version)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not query runtime version");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests;

//! HTTP surface: one chain mounted under a configurable path.

pub mod error;
pub mod handlers;
pub mod schema;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::{EquivalenceChain, Error};

pub use error::ApiError;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<EquivalenceChain>,
}

impl AppState {
    pub fn new(chain: EquivalenceChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }
}

fn chain_routes() -> Router<AppState> {
    Router::new()
        .route("/invoke", post(handlers::invoke))
        .route("/batch", post(handlers::batch))
        .route("/input_schema", get(handlers::input_schema))
        .route("/output_schema", get(handlers::output_schema))
        .route("/config_schema", get(handlers::config_schema))
}

/// Build the application router with the chain mounted at `path`.
pub fn router(state: AppState, path: &str) -> Router {
    let base = Router::new().route("/health", get(handlers::health));
    let app = if path == "/" {
        base.merge(chain_routes())
    } else {
        base.nest(path, chain_routes())
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Bind the listener and serve until a shutdown signal arrives.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), Error> {
    let path = config.normalized_path()?;
    let app = router(state, &path);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, %path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
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
    tracing::info!("shutdown signal received");
}

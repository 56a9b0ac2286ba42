//! Wozzit node.
//!
//! - HTTP listener on `node.bindAddress:node.port` (default `0.0.0.0:10207`)
//! - Config from `wozzit.yaml`, or the path given as the first argument
//! - `RUST_LOG` overrides `node.logLevel`

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use wozzit_core::error::{Result, WozzitError};
use wozzit_node::{app_state, config, router};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "wozzit.yaml".to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config load failed ({path}): {e}");
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.node.log_level.as_filter()));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run(cfg).await {
        tracing::error!(error = %e, "wozzit-node failed");
        std::process::exit(1);
    }
}

async fn run(cfg: config::NodeConfig) -> Result<()> {
    let listen = cfg.node.listen_addr()?;
    let state = app_state::AppState::new(&cfg)?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| WozzitError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "Wozzit node listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| WozzitError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("^C received, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    }
}

//! Soilsense: soil fertility prediction web service.
//!
//! Main entry point for the HTTP server.

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use soilsense::config::AppConfig;
use soilsense::logging::init_logging;
use soilsense::web::{build_router, load_state, AppState};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                tracing::warn!("Failed to register signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn serve(state: AppState, addr: &str) -> soilsense::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _guard = init_logging(config.log_mode, &config.log_file)
        .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;

    tracing::info!("Starting Soilsense...");
    tracing::info!("Loading model from {:?}", config.model_dir);

    // No fallback model: refuse to serve without a verified artifact.
    let state = load_state(&config.model_dir).map_err(|e| {
        tracing::error!("Model load failed: {}", e);
        e
    })?;
    tracing::info!("Model loaded ({})", state.predictor.model_name());

    let addr = config.bind_addr();
    serve(state, &addr)
        .await
        .with_context(|| format!("Server on {addr} failed"))?;

    tracing::info!("Soilsense shutdown complete.");
    Ok(())
}

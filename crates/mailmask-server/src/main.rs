use std::sync::Arc;

use anyhow::{Context, Result};
use mailmask_core::{Redactor, TfidfLinearClassifier};
use mailmask_server::{build_app, logging, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    // No classifier, no service
    let classifier = TfidfLinearClassifier::load(&config.model_path)
        .with_context(|| format!("Server startup failed: {}", config.model_path.display()))?;

    let state = AppState::new(Arc::new(Redactor::default()), Some(Arc::new(classifier)));
    let app = build_app(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

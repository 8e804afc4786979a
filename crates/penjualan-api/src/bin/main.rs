//! Prediction service entry point.
//!
//! Loads the scaler and model artifacts from the working directory, then
//! serves the prediction API. Startup is all-or-nothing: a missing or
//! malformed artifact aborts the process before the listener binds.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use penjualan_api::{create_router, AppState};
use penjualan_core::Artifacts;

/// The service always binds here; deployments front it as needed.
const BIND_ADDR: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let dir = std::env::current_dir().context("cannot resolve working directory")?;
    let artifacts = Artifacts::load_from_dir(&dir).context("artifact loading failed")?;
    tracing::info!(
        "Loaded {} model with {} features from {}",
        artifacts.model_name(),
        artifacts.num_features(),
        dir.display()
    );

    let router = create_router(AppState::new(artifacts));
    let listener = tokio::net::TcpListener::bind(BIND_ADDR)
        .await
        .with_context(|| format!("cannot bind {BIND_ADDR}"))?;
    tracing::info!("Starting prediction service on {}", BIND_ADDR);

    axum::serve(listener, router).await?;

    Ok(())
}

//! CloudIQ Remediator server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudiq_remediator::config::{Config, LogFormat};
use cloudiq_remediator::logic::{ClassifierHandle, CommandDispatcher};
use cloudiq_remediator::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_logging(config.log_format);

    tracing::info!("CloudIQ Remediator starting...");
    config.validate_policy().context("invalid remediation policy")?;
    tracing::info!(
        "Policy: cpu > {} scales {} to {} replicas",
        config.cpu_threshold,
        config.scale_target(),
        config.target_replicas
    );

    // Load model once
    let classifier = ClassifierHandle::load(config.model_path.as_deref());
    let dispatcher = Arc::new(CommandDispatcher::kubectl(&config));

    let port = config.port;
    let state = AppState::new(config, classifier, dispatcher);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("CloudIQ Remediator stopped");
    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cloudiq_remediator=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

//! Emoserve
//!
//! HTTP service that forwards user text to a pretrained emotion
//! classification model and returns the top label with its confidence.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

use emoserve_server::{config::ServerConfig, routes, state::AppState, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting emoserve");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Model: {}", config.model_source().id());

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Initialize application state (downloads and loads the model)
    info!("Initializing application state...");
    let state = AppState::new(config, metrics_handle).await?;
    info!(
        "Classifier ready: {}",
        state.classifier.model_id()
    );

    // Build and run the server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("emoserve_server=debug,emoserve_classifiers=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("emoserve_server=info,emoserve_classifiers=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "emoserve_requests_total",
        "Total number of analyze requests received"
    );
    metrics::describe_counter!(
        "emoserve_errors_total",
        "Total number of request failures by kind"
    );
    metrics::describe_histogram!(
        "emoserve_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classifier inference latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

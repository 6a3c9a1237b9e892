// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize logs only. Used by the CLI, which writes results to stdout.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> Result<(), String> {
    // 1. Initialize Tracing (Logs)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "poe_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Initialize Metrics (Prometheus)
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("failed to install Prometheus recorder: {e}"))?;

    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!("poe_extrinsics_submitted_total", "Extrinsics accepted into the pool");
    metrics::describe_counter!("poe_extrinsics_invalid_total", "Extrinsics rejected at validation");
    metrics::describe_counter!("poe_blocks_authored_total", "Blocks sealed by the dev chain");
    metrics::describe_gauge!("poe_claims", "Claims currently stored");

    metrics::gauge!("poe_node_up", 1.0);
    Ok(())
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    // 1. Tracing
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "snapclaim_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer());
    if subscriber.try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }

    // 2. Prometheus
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::warn!("Prometheus recorder not installed: {}", e),
    }

    metrics::describe_counter!("snapclaim_snapshots_built_total", "Snapshots committed by this node");
    metrics::describe_gauge!("snapclaim_snapshots_loaded", "Snapshots currently held in the registry");
    metrics::describe_counter!("snapclaim_claims_prepared_total", "Claim preparations by outcome");
    metrics::describe_counter!("snapclaim_claim_rejections_total", "Claim rejections by reason");
    metrics::describe_counter!("snapclaim_claims_submitted_total", "Claim submissions by result");
    metrics::describe_counter!("snapclaim_sync_drift_total", "Cache views that disagreed with the ledger");
    metrics::describe_histogram!("snapclaim_ledger_request_duration_seconds", "Destination ledger round-trip time");

    metrics::gauge!("snapclaim_node_up", 1.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use snapclaim_node::config::NodeConfig;
use snapclaim_node::errors::NodeError;
use snapclaim_node::ledger::{gateway, InMemoryLedger, LedgerBackend, RpcLedgerClient};
use snapclaim_node::registry::SnapshotRegistry;
use snapclaim_node::server::{build_router_with, AppState};
use snapclaim_node::telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    telemetry::init_telemetry();

    let cfg = NodeConfig::from_env()?;
    tracing::info!(
        "Initializing SnapClaim Node: scheme={} cache_max_age={}s data_dir={:?}",
        cfg.scheme,
        cfg.cache_max_age_secs,
        cfg.data_dir
    );

    let registry = Arc::new(SnapshotRegistry::new(cfg.data_dir.clone()));
    let restored = registry.load().await?;
    if restored > 0 {
        tracing::info!("Restored {} snapshots", restored);
    }

    let (backend, dev_gateway) = match &cfg.ledger_url {
        Some(url) => {
            tracing::info!("Destination ledger: {}", url);
            let client = RpcLedgerClient::new(url, cfg.ledger_timeout)?;
            (LedgerBackend::Rpc(client), None)
        }
        None => {
            tracing::warn!("No SNAPCLAIM_LEDGER_URL: using the in-memory dev ledger");
            let ledger = InMemoryLedger::new(cfg.scheme);
            (LedgerBackend::Memory(ledger.clone()), Some(gateway::router(ledger)))
        }
    };

    let state = AppState::new(cfg.scheme, Arc::new(backend), registry, cfg.cache_max_age_secs);
    // Dev ledger admin and gateway API share the port and the bearer guard.
    let app = build_router_with(state, cfg.auth_token.clone(), dev_gateway);

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::extract::{Path, Request as AxumRequest, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use snapclaim_kernel::claim::ClaimDecision;
use snapclaim_kernel::error::KernelError;
use snapclaim_kernel::snapshot::SnapshotPayload;
use snapclaim_kernel::types::{digest_from_hex, digest_to_hex, parse_amount};
use snapclaim_kernel::verify::verify_encoded;
use snapclaim_kernel::{Address, CommitmentScheme, Digest, HolderEntry, Snapshot};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::errors::NodeError;
use crate::ledger::DestinationLedger;
use crate::orchestrator::{ClaimOrchestrator, ClaimOutcome};
use crate::registry::SnapshotRegistry;
use crate::sync_guard::{ClaimCache, StateSyncGuard};
use crate::telemetry;

pub struct AppState<L> {
    pub scheme: CommitmentScheme,
    pub registry: Arc<SnapshotRegistry>,
    pub orchestrator: Arc<ClaimOrchestrator<L>>,
    pub guard: Arc<StateSyncGuard<L>>,
}

impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            scheme: self.scheme,
            registry: self.registry.clone(),
            orchestrator: self.orchestrator.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<L: DestinationLedger> AppState<L> {
    /// Wires one ledger and one cache into every component that needs them.
    pub fn new(scheme: CommitmentScheme, ledger: Arc<L>, registry: Arc<SnapshotRegistry>, cache_max_age_secs: u64) -> Self {
        let cache = Arc::new(ClaimCache::new());
        Self {
            scheme,
            registry,
            orchestrator: Arc::new(ClaimOrchestrator::new(scheme, ledger.clone(), cache.clone())),
            guard: Arc::new(StateSyncGuard::new(ledger, cache, cache_max_age_secs)),
        }
    }
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router<L: DestinationLedger>(state: AppState<L>, auth_token: Option<String>) -> Router {
    build_router_with(state, auth_token, None)
}

/// Like [`build_router`], with extra routes (the dev ledger gateway) served
/// behind the same auth, CORS and trace layers.
pub fn build_router_with<L: DestinationLedger>(
    state: AppState<L>,
    auth_token: Option<String>,
    extra: Option<Router>,
) -> Router {
    let mut app = Router::new()
        .route("/v1/snapshots", post(build_snapshot::<L>))
        .route("/v1/snapshots/import", post(import_snapshot::<L>))
        .route("/v1/snapshots/:root", get(get_snapshot::<L>))
        .route("/v1/snapshots/:root/claims/:address", get(get_claim::<L>))
        .route("/v1/claims/verify", post(verify_claim::<L>))
        .route("/v1/claims/prepare", post(prepare_claim::<L>))
        .route("/v1/claims/submit", post(submit_claim::<L>))
        .route("/v1/claims/:root/:address/status", get(claim_status::<L>))
        .with_state(state);

    if let Some(extra) = extra {
        app = app.merge(extra);
    }

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    // Scrapers do not carry the bearer token.
    app.route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn parse_root(text: &str) -> Result<Digest, NodeError> {
    Ok(digest_from_hex(text)?)
}

/// The node commits and verifies under one scheme. A request may restate it, never change it.
fn pinned_scheme(configured: CommitmentScheme, requested: Option<CommitmentScheme>) -> Result<CommitmentScheme, NodeError> {
    match requested {
        Some(found) if found != configured => Err(KernelError::SchemeMismatch {
            expected: configured.tag(),
            found: found.tag(),
        }
        .into()),
        _ => Ok(configured),
    }
}

fn parse_address(text: &str) -> Result<Address, NodeError> {
    Ok(Address::parse(text)?)
}

fn summary(snapshot: &Snapshot) -> Result<SnapshotSummary, NodeError> {
    Ok(SnapshotSummary {
        root: digest_to_hex(&snapshot.root()),
        scheme: snapshot.scheme(),
        claim_count: snapshot.len(),
        total_tokens: snapshot.total_amount()?.to_string(),
        created_at: snapshot.created_at(),
    })
}

async fn build_snapshot<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Json(req): Json<BuildSnapshotRequest>,
) -> Result<Json<SnapshotSummary>, NodeError> {
    let scheme = pinned_scheme(state.scheme, req.scheme)?;
    let pairs = req
        .holders
        .into_iter()
        .map(|h| Ok((h.address, parse_amount(&h.amount)?)))
        .collect::<Result<Vec<_>, NodeError>>()?;
    let holders = HolderEntry::enumerate(pairs)?;

    let snapshot = state.registry.build(scheme, holders).await?;
    Ok(Json(summary(&snapshot)?))
}

async fn import_snapshot<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Json(payload): Json<SnapshotPayload>,
) -> Result<Json<SnapshotSummary>, NodeError> {
    let scheme = pinned_scheme(state.scheme, payload.scheme)?;
    let snapshot = state.registry.import(payload, scheme).await?;
    Ok(Json(summary(&snapshot)?))
}

async fn get_snapshot<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Path(root): Path<String>,
) -> Result<Json<SnapshotPayload>, NodeError> {
    let snapshot = state.registry.get_or_err(&parse_root(&root)?).await?;
    Ok(Json(snapshot.to_payload()))
}

async fn get_claim<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Path((root, address)): Path<(String, String)>,
) -> Result<Json<ClaimView>, NodeError> {
    let snapshot = state.registry.get_or_err(&parse_root(&root)?).await?;
    let address = parse_address(&address)?;
    let claim = snapshot
        .claim(&address)
        .ok_or_else(|| NodeError::AddressNotInSnapshot(address.to_base58()))?;

    Ok(Json(ClaimView {
        root: digest_to_hex(&snapshot.root()),
        address,
        amount: claim.amount.to_string(),
        index: claim.position,
        proof: claim.proof.to_hex(),
    }))
}

/// Off-chain pre-check. Pure: touches neither the registry nor the ledger.
async fn verify_claim<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, NodeError> {
    let scheme = pinned_scheme(state.scheme, req.scheme)?;
    let valid = verify_encoded(scheme, &req.address, &req.amount, req.index, &req.proof[..], &req.root)?;
    Ok(Json(VerifyResponse { valid }))
}

async fn prepare_claim<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<PrepareResponse>, NodeError> {
    let snapshot = state.registry.get_or_err(&parse_root(&req.root)?).await?;
    let address = parse_address(&req.address)?;

    match state.orchestrator.prepare_claim(&address, &snapshot).await? {
        ClaimDecision::Ready(instruction) => Ok(Json(PrepareResponse { instruction })),
        ClaimDecision::Rejected(rejection) => Err(NodeError::Rejected(rejection)),
    }
}

async fn submit_claim<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<SubmitResponse>, NodeError> {
    let snapshot = state.registry.get_or_err(&parse_root(&req.root)?).await?;
    let address = parse_address(&req.address)?;

    match state.orchestrator.prepare_and_submit(&address, &snapshot).await? {
        ClaimOutcome::Submitted(receipt) => Ok(Json(SubmitResponse { receipt })),
        ClaimOutcome::Rejected(rejection) => Err(NodeError::Rejected(rejection)),
    }
}

async fn claim_status<L: DestinationLedger>(
    State(state): State<AppState<L>>,
    Path((root, address)): Path<(String, String)>,
) -> Result<Json<ClaimStatusResponse>, NodeError> {
    let root = parse_root(&root)?;
    let address = parse_address(&address)?;
    let in_snapshot = state
        .registry
        .get(&root)
        .await
        .map_or(false, |s| s.claim(&address).is_some());

    let verdict = state.guard.check(&root, &address).await?;
    Ok(Json(ClaimStatusResponse { in_snapshot, verdict }))
}

async fn metrics_handler() -> String {
    telemetry::get_metrics()
}

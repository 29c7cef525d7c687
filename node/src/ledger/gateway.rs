// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! HTTP gateway over an [`InMemoryLedger`].
//!
//! Serves the API [`super::RpcLedgerClient`] speaks, plus the admin calls a
//! deployment would make on the real ledger (anchor, pause/finalize, fund).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use snapclaim_kernel::claim::{ClaimInstruction, ClaimRecord, ClaimRejection, CommitmentRecord, CommitmentStatus};
use snapclaim_kernel::types::{digest::serde_hex, digest_from_hex};
use snapclaim_kernel::{Address, Amount, Digest};

use super::{DestinationLedger, InMemoryLedger, LedgerError, SubmitReceipt, ABSENT_RECORD};
use crate::errors::{rejection_status, NodeError};

#[derive(Debug, Serialize, Deserialize)]
pub struct AnchorRequest {
    #[serde(with = "serde_hex")]
    pub root: Digest,
    pub total_supply: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: CommitmentStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FundRequest {
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultResponse {
    pub balance: Amount,
}

fn refuse(rejection: ClaimRejection) -> Response {
    (rejection_status(&rejection), Json(rejection)).into_response()
}

fn ledger_failure(e: LedgerError) -> Response {
    match e {
        LedgerError::Rejected(rejection) => refuse(rejection),
        LedgerError::AlreadyAnchored => {
            (StatusCode::CONFLICT, Json(json!({ "error": e.to_string() }))).into_response()
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": other.to_string() }))).into_response(),
    }
}

fn parse_root(root: &str) -> Result<Digest, Response> {
    digest_from_hex(root).map_err(|e| NodeError::from(e).into_response())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": ABSENT_RECORD }))).into_response()
}

pub fn router(ledger: InMemoryLedger) -> Router {
    Router::new()
        .route("/v1/commitments", post(anchor))
        .route("/v1/commitments/:root", get(commitment))
        .route("/v1/commitments/:root/status", put(set_status))
        .route("/v1/commitments/:root/vault", get(vault).post(fund))
        .route("/v1/commitments/:root/claims", post(submit))
        .route("/v1/commitments/:root/claims/:address", get(claim_record))
        .with_state(ledger)
}

async fn anchor(
    State(ledger): State<InMemoryLedger>,
    Json(req): Json<AnchorRequest>,
) -> Result<Json<CommitmentRecord>, Response> {
    ledger.anchor(req.root, req.total_supply).await.map(Json).map_err(ledger_failure)
}

async fn commitment(
    State(ledger): State<InMemoryLedger>,
    Path(root): Path<String>,
) -> Result<Json<CommitmentRecord>, Response> {
    let root = parse_root(&root)?;
    match ledger.fetch_commitment(&root).await.map_err(ledger_failure)? {
        Some(record) => Ok(Json(record)),
        None => Err(not_found()),
    }
}

async fn set_status(
    State(ledger): State<InMemoryLedger>,
    Path(root): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<CommitmentRecord>, Response> {
    let root = parse_root(&root)?;
    ledger.set_status(&root, req.status).await.map(Json).map_err(ledger_failure)
}

async fn vault(
    State(ledger): State<InMemoryLedger>,
    Path(root): Path<String>,
) -> Result<Json<VaultResponse>, Response> {
    let root = parse_root(&root)?;
    match ledger.fetch_vault_balance(&root).await.map_err(ledger_failure)? {
        Some(balance) => Ok(Json(VaultResponse { balance })),
        None => Err(not_found()),
    }
}

async fn fund(
    State(ledger): State<InMemoryLedger>,
    Path(root): Path<String>,
    Json(req): Json<FundRequest>,
) -> Result<Json<VaultResponse>, Response> {
    let root = parse_root(&root)?;
    let balance = ledger.fund_vault(&root, req.amount).await.map_err(ledger_failure)?;
    Ok(Json(VaultResponse { balance }))
}

async fn submit(
    State(ledger): State<InMemoryLedger>,
    Path(root): Path<String>,
    Json(instruction): Json<ClaimInstruction>,
) -> Result<Json<SubmitReceipt>, Response> {
    let root = parse_root(&root)?;
    if root != instruction.root {
        return Err(NodeError::InvalidInput("instruction root does not match path".to_string()).into_response());
    }
    ledger.submit_claim(&instruction).await.map(Json).map_err(ledger_failure)
}

async fn claim_record(
    State(ledger): State<InMemoryLedger>,
    Path((root, address)): Path<(String, String)>,
) -> Result<Json<ClaimRecord>, Response> {
    let root = parse_root(&root)?;
    let address = Address::parse(&address).map_err(|e| NodeError::from(e).into_response())?;
    match ledger.fetch_claim_record(&root, &address).await.map_err(ledger_failure)? {
        Some(record) => Ok(Json(record)),
        None => Err(not_found()),
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};
use snapclaim_kernel::claim::ClaimInstruction;
use snapclaim_kernel::sync::SyncVerdict;
use snapclaim_kernel::{Address, CommitmentScheme};

use crate::ledger::SubmitReceipt;

#[derive(Debug, Serialize, Deserialize)]
pub struct HolderInput {
    pub address: Address,
    /// Decimal string; u64 does not survive every JSON client.
    pub amount: String,
}

/// Holders are committed in list order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildSnapshotRequest {
    #[serde(default)]
    pub scheme: Option<CommitmentScheme>,
    pub holders: Vec<HolderInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub root: String,
    pub scheme: CommitmentScheme,
    pub claim_count: usize,
    pub total_tokens: String,
    pub created_at: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimView {
    pub root: String,
    pub address: Address,
    pub amount: String,
    pub index: u32,
    pub proof: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub root: String,
    pub address: String,
    pub amount: String,
    pub index: u32,
    pub proof: Vec<String>,
    #[serde(default)]
    pub scheme: Option<CommitmentScheme>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub root: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrepareResponse {
    pub instruction: ClaimInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub receipt: SubmitReceipt,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimStatusResponse {
    pub in_snapshot: bool,
    pub verdict: SyncVerdict,
}

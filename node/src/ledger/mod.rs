// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Destination ledger seam.
//!
//! Everything the claim path knows about the destination ledger goes through
//! [`DestinationLedger`]. Implementations are passed in explicitly so tests can
//! inject a fake without any process-wide setup.

pub mod gateway;
pub mod memory;
pub mod rpc;

use std::future::Future;

use serde::{Deserialize, Serialize};
use snapclaim_kernel::claim::{ClaimInstruction, ClaimRecord, ClaimRejection, CommitmentRecord};
use snapclaim_kernel::types::digest::serde_hex;
use snapclaim_kernel::{Address, Amount, Digest};
use thiserror::Error;

/// `error` text of a gateway 404 that means "no such record". Any other 404
/// (wrong base path, proxy route miss) is a failure, not an absence.
pub const ABSENT_RECORD: &str = "not found";

pub use memory::InMemoryLedger;
pub use rpc::RpcLedgerClient;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode: {0}")]
    Decode(String),
    #[error("vault balance overflow")]
    VaultOverflow,
    #[error("commitment already anchored")]
    AlreadyAnchored,
    #[error("claim refused by ledger: {0}")]
    Rejected(ClaimRejection),
}

/// Proof of execution returned by the transfer authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(with = "serde_hex")]
    pub root: Digest,
    pub address: Address,
    pub amount: Amount,
    /// Ledger-assigned, strictly increasing.
    pub sequence: u64,
}

/// The destination ledger program, as seen from the claim path.
///
/// Every call is a round-trip to the authority. None of them may be assumed to
/// succeed instantly or to stay true after it returns.
pub trait DestinationLedger: Send + Sync + 'static {
    fn fetch_commitment(
        &self,
        root: &Digest,
    ) -> impl Future<Output = Result<Option<CommitmentRecord>, LedgerError>> + Send;

    fn fetch_claim_record(
        &self,
        root: &Digest,
        address: &Address,
    ) -> impl Future<Output = Result<Option<ClaimRecord>, LedgerError>> + Send;

    /// `None` when no vault backs the root.
    fn fetch_vault_balance(&self, root: &Digest) -> impl Future<Output = Result<Option<Amount>, LedgerError>> + Send;

    /// Atomic mark-claimed plus transfer.
    fn submit_claim(
        &self,
        instruction: &ClaimInstruction,
    ) -> impl Future<Output = Result<SubmitReceipt, LedgerError>> + Send;
}

/// Ledger selected at startup.
#[derive(Clone)]
pub enum LedgerBackend {
    Memory(InMemoryLedger),
    Rpc(RpcLedgerClient),
}

impl DestinationLedger for LedgerBackend {
    async fn fetch_commitment(&self, root: &Digest) -> Result<Option<CommitmentRecord>, LedgerError> {
        match self {
            LedgerBackend::Memory(l) => l.fetch_commitment(root).await,
            LedgerBackend::Rpc(l) => l.fetch_commitment(root).await,
        }
    }

    async fn fetch_claim_record(&self, root: &Digest, address: &Address) -> Result<Option<ClaimRecord>, LedgerError> {
        match self {
            LedgerBackend::Memory(l) => l.fetch_claim_record(root, address).await,
            LedgerBackend::Rpc(l) => l.fetch_claim_record(root, address).await,
        }
    }

    async fn fetch_vault_balance(&self, root: &Digest) -> Result<Option<Amount>, LedgerError> {
        match self {
            LedgerBackend::Memory(l) => l.fetch_vault_balance(root).await,
            LedgerBackend::Rpc(l) => l.fetch_vault_balance(root).await,
        }
    }

    async fn submit_claim(&self, instruction: &ClaimInstruction) -> Result<SubmitReceipt, LedgerError> {
        match self {
            LedgerBackend::Memory(l) => l.submit_claim(instruction).await,
            LedgerBackend::Rpc(l) => l.submit_claim(instruction).await,
        }
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Claim orchestration.
//!
//! ```text
//! 1. commitment active      absent -> CommitmentNotFound   present, not active -> CommitmentInactive
//! 2. not already claimed    any ClaimRecord -> AlreadyClaimed
//! 3. proof valid            kernel verifier against the snapshot root -> InvalidProof
//! 4. reserve sufficient     vault < amount -> InsufficientReserve
//! ```
//! Checks run in that order, each a fresh ledger round-trip, and stop at the
//! first failure. A snapshot committed under a scheme other than the node's is
//! malformed input: the ledger would verify it with a different digest. A ledger transport error is an error, not a pass or a fail.
//! The orchestrator never transfers anything itself; the ledger's atomic claim
//! recording is the final word.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use snapclaim_kernel::claim::{ClaimDecision, ClaimInstruction, ClaimRejection};
use snapclaim_kernel::error::KernelError;
use snapclaim_kernel::sync::{CachedClaimView, CommitmentState, Observation};
use snapclaim_kernel::verify::verify;
use snapclaim_kernel::{Address, CommitmentScheme, Snapshot};

use crate::errors::NodeError;
use crate::ledger::{DestinationLedger, SubmitReceipt};
use crate::sync_guard::{unix_now, ClaimCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Submitted(SubmitReceipt),
    Rejected(ClaimRejection),
}

pub struct ClaimOrchestrator<L> {
    scheme: CommitmentScheme,
    ledger: Arc<L>,
    cache: Arc<ClaimCache>,
}

fn observe(op: &'static str, started: Instant) {
    metrics::histogram!(
        "snapclaim_ledger_request_duration_seconds",
        started.elapsed().as_secs_f64(),
        "op" => op
    );
}

impl<L: DestinationLedger> ClaimOrchestrator<L> {
    pub fn new(scheme: CommitmentScheme, ledger: Arc<L>, cache: Arc<ClaimCache>) -> Self {
        Self { scheme, ledger, cache }
    }

    pub fn scheme(&self) -> CommitmentScheme {
        self.scheme
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub async fn prepare_claim(&self, address: &Address, snapshot: &Snapshot) -> Result<ClaimDecision, NodeError> {
        let decision = self.run_checks(address, snapshot).await?;

        match &decision {
            ClaimDecision::Ready(instruction) => {
                tracing::info!("Claim ready: {} amount={}", address, instruction.amount);
            }
            ClaimDecision::Rejected(rejection) => {
                tracing::info!(
                    "Claim rejected: {} reason={} retryable={}",
                    address,
                    rejection.reason_code(),
                    rejection.is_retryable()
                );
                metrics::counter!("snapclaim_claim_rejections_total", 1, "reason" => rejection.reason_code());
            }
        }
        metrics::counter!("snapclaim_claims_prepared_total", 1, "outcome" => decision.outcome());

        Ok(decision)
    }

    async fn run_checks(&self, address: &Address, snapshot: &Snapshot) -> Result<ClaimDecision, NodeError> {
        if snapshot.scheme() != self.scheme {
            return Err(KernelError::SchemeMismatch {
                expected: self.scheme.tag(),
                found: snapshot.scheme().tag(),
            }
            .into());
        }
        let root = snapshot.root();

        // 1. Commitment
        let started = Instant::now();
        let commitment = self.ledger.fetch_commitment(&root).await?;
        observe("fetch_commitment", started);
        let state = CommitmentState::from_record(commitment.as_ref());
        let mut view = CachedClaimView {
            commitment: Observation::Known(state),
            claimed: Observation::Unknown,
            observed_at: unix_now(),
        };
        match commitment {
            None => return self.reject(snapshot, address, view, ClaimRejection::CommitmentNotFound).await,
            Some(record) if !record.status.is_active() => {
                let rejection = ClaimRejection::CommitmentInactive { status: record.status };
                return self.reject(snapshot, address, view, rejection).await;
            }
            Some(_) => {}
        }

        // 2. Prior claim
        let started = Instant::now();
        let prior = self.ledger.fetch_claim_record(&root, address).await?;
        observe("fetch_claim_record", started);
        view.claimed = Observation::Known(prior.is_some());
        if prior.is_some() {
            return self.reject(snapshot, address, view, ClaimRejection::AlreadyClaimed).await;
        }

        // 3. Proof
        let Some(claim) = snapshot.claim(address) else {
            tracing::debug!("Address {} not in snapshot", address);
            return self.reject(snapshot, address, view, ClaimRejection::InvalidProof).await;
        };
        if !verify(self.scheme, &claim.holder(*address), &claim.proof, &root) {
            return self.reject(snapshot, address, view, ClaimRejection::InvalidProof).await;
        }

        // 4. Reserve
        let started = Instant::now();
        let available = self.ledger.fetch_vault_balance(&root).await?.unwrap_or(0);
        observe("fetch_vault_balance", started);
        self.cache.record(root, *address, view).await;
        if available < claim.amount {
            return Ok(ClaimDecision::Rejected(ClaimRejection::InsufficientReserve {
                available,
                required: claim.amount,
            }));
        }

        Ok(ClaimDecision::Ready(ClaimInstruction {
            root,
            address: *address,
            amount: claim.amount,
            position: claim.position,
            proof: claim.proof.clone(),
        }))
    }

    /// Remembers what the ledger just said, then rejects.
    async fn reject(
        &self,
        snapshot: &Snapshot,
        address: &Address,
        view: CachedClaimView,
        rejection: ClaimRejection,
    ) -> Result<ClaimDecision, NodeError> {
        self.cache.record(snapshot.root(), *address, view).await;
        Ok(ClaimDecision::Rejected(rejection))
    }

    /// Forwards a prepared instruction to the transfer authority.
    pub async fn submit(&self, instruction: &ClaimInstruction) -> Result<SubmitReceipt, NodeError> {
        let started = Instant::now();
        let result = self.ledger.submit_claim(instruction).await;
        observe("submit_claim", started);

        match result {
            Ok(receipt) => {
                self.cache.mark_claimed(instruction.root, instruction.address).await;
                tracing::info!("Claim submitted: {} seq={}", instruction.address, receipt.sequence);
                metrics::counter!("snapclaim_claims_submitted_total", 1, "result" => "ok");
                Ok(receipt)
            }
            Err(e) => {
                metrics::counter!("snapclaim_claims_submitted_total", 1, "result" => "refused");
                Err(e.into())
            }
        }
    }

    /// Prepare then submit, with nothing cached in between.
    pub async fn prepare_and_submit(&self, address: &Address, snapshot: &Snapshot) -> Result<ClaimOutcome, NodeError> {
        match self.prepare_claim(address, snapshot).await? {
            ClaimDecision::Ready(instruction) => match self.submit(&instruction).await {
                Ok(receipt) => Ok(ClaimOutcome::Submitted(receipt)),
                // Lost a race the pre-checks could not see.
                Err(NodeError::Rejected(rejection)) => Ok(ClaimOutcome::Rejected(rejection)),
                Err(e) => Err(e),
            },
            ClaimDecision::Rejected(rejection) => Ok(ClaimOutcome::Rejected(rejection)),
        }
    }

    /// Independent preparations for many addresses, run concurrently.
    pub async fn prepare_batch(
        &self,
        addresses: &[Address],
        snapshot: &Snapshot,
    ) -> Vec<(Address, Result<ClaimDecision, NodeError>)> {
        let results = join_all(addresses.iter().map(|a| self.prepare_claim(a, snapshot))).await;
        addresses.iter().copied().zip(results).collect()
    }
}

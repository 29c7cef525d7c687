// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-process destination ledger.
//!
//! Plays the part of the on-chain program for development and tests. Claim
//! execution runs under one lock and re-checks everything itself, including
//! the proof, so it is the real correctness boundary for double claims.

use std::collections::HashMap;
use std::sync::Arc;

use snapclaim_kernel::claim::{ClaimInstruction, ClaimRecord, ClaimRejection, CommitmentRecord, CommitmentStatus};
use snapclaim_kernel::verify::verify;
use snapclaim_kernel::{Address, Amount, CommitmentScheme, Digest};
use tokio::sync::Mutex;

use super::{DestinationLedger, LedgerError, SubmitReceipt};

#[derive(Default)]
struct LedgerBook {
    commitments: HashMap<Digest, CommitmentRecord>,
    claims: HashMap<(Digest, Address), ClaimRecord>,
    vaults: HashMap<Digest, Amount>,
    sequence: u64,
}

#[derive(Clone)]
pub struct InMemoryLedger {
    scheme: CommitmentScheme,
    book: Arc<Mutex<LedgerBook>>,
}

impl InMemoryLedger {
    pub fn new(scheme: CommitmentScheme) -> Self {
        Self {
            scheme,
            book: Arc::new(Mutex::new(LedgerBook::default())),
        }
    }

    pub fn scheme(&self) -> CommitmentScheme {
        self.scheme
    }

    /// Anchors `root` as an active commitment.
    pub async fn anchor(&self, root: Digest, total_supply: Amount) -> Result<CommitmentRecord, LedgerError> {
        let mut book = self.book.lock().await;
        if book.commitments.contains_key(&root) {
            return Err(LedgerError::AlreadyAnchored);
        }
        let record = CommitmentRecord::new(root, total_supply);
        book.commitments.insert(root, record.clone());
        tracing::info!("Ledger: anchored root {}", snapclaim_kernel::types::digest_to_hex(&root));
        Ok(record)
    }

    pub async fn set_status(&self, root: &Digest, status: CommitmentStatus) -> Result<CommitmentRecord, LedgerError> {
        let mut book = self.book.lock().await;
        let record = book
            .commitments
            .get_mut(root)
            .ok_or(LedgerError::Rejected(ClaimRejection::CommitmentNotFound))?;
        record.status = status;
        Ok(record.clone())
    }

    /// Adds `amount` to the vault backing `root`. Returns the new balance.
    pub async fn fund_vault(&self, root: &Digest, amount: Amount) -> Result<Amount, LedgerError> {
        let mut book = self.book.lock().await;
        let balance = book.vaults.entry(*root).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::VaultOverflow)?;
        Ok(*balance)
    }
}

impl DestinationLedger for InMemoryLedger {
    async fn fetch_commitment(&self, root: &Digest) -> Result<Option<CommitmentRecord>, LedgerError> {
        Ok(self.book.lock().await.commitments.get(root).cloned())
    }

    async fn fetch_claim_record(&self, root: &Digest, address: &Address) -> Result<Option<ClaimRecord>, LedgerError> {
        Ok(self.book.lock().await.claims.get(&(*root, *address)).cloned())
    }

    async fn fetch_vault_balance(&self, root: &Digest) -> Result<Option<Amount>, LedgerError> {
        Ok(self.book.lock().await.vaults.get(root).copied())
    }

    async fn submit_claim(&self, instruction: &ClaimInstruction) -> Result<SubmitReceipt, LedgerError> {
        let mut book = self.book.lock().await;
        let root = instruction.root;

        let status = book
            .commitments
            .get(&root)
            .map(|c| c.status)
            .ok_or(LedgerError::Rejected(ClaimRejection::CommitmentNotFound))?;
        if !status.is_active() {
            return Err(LedgerError::Rejected(ClaimRejection::CommitmentInactive { status }));
        }

        if book.claims.contains_key(&(root, instruction.address)) {
            return Err(LedgerError::Rejected(ClaimRejection::AlreadyClaimed));
        }

        if instruction.amount == 0 || !verify(self.scheme, &instruction.holder(), &instruction.proof, &root) {
            return Err(LedgerError::Rejected(ClaimRejection::InvalidProof));
        }

        let available = book.vaults.get(&root).copied().unwrap_or(0);
        if available < instruction.amount {
            return Err(LedgerError::Rejected(ClaimRejection::InsufficientReserve {
                available,
                required: instruction.amount,
            }));
        }

        // All checks passed: mutate.
        book.vaults.insert(root, available - instruction.amount);
        if let Some(commitment) = book.commitments.get_mut(&root) {
            commitment.migrated_amount = commitment.migrated_amount.saturating_add(instruction.amount);
        }
        book.claims.insert(
            (root, instruction.address),
            ClaimRecord {
                address: instruction.address,
                amount_claimed: instruction.amount,
                claimed: true,
            },
        );
        book.sequence += 1;

        Ok(SubmitReceipt {
            root,
            address: instruction.address,
            amount: instruction.amount,
            sequence: book.sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapclaim_kernel::{HolderEntry, Snapshot};

    fn instruction_for(snapshot: &Snapshot, address: Address) -> ClaimInstruction {
        let claim = snapshot.claim(&address).unwrap();
        ClaimInstruction {
            root: snapshot.root(),
            address,
            amount: claim.amount,
            position: claim.position,
            proof: claim.proof.clone(),
        }
    }

    #[tokio::test]
    async fn test_submit_is_at_most_once() {
        let scheme = CommitmentScheme::Sha256V1;
        let a = Address::new([1; 32]);
        let b = Address::new([2; 32]);
        let entries = HolderEntry::enumerate([(a, 1_000), (b, 500)]).unwrap();
        let snapshot = Snapshot::build(scheme, &entries, 0).unwrap();

        let ledger = InMemoryLedger::new(scheme);
        ledger.anchor(snapshot.root(), 1_500).await.unwrap();
        ledger.fund_vault(&snapshot.root(), 1_500).await.unwrap();

        let receipt = ledger.submit_claim(&instruction_for(&snapshot, a)).await.unwrap();
        assert_eq!(receipt.sequence, 1);
        assert_eq!(
            ledger.submit_claim(&instruction_for(&snapshot, a)).await,
            Err(LedgerError::Rejected(ClaimRejection::AlreadyClaimed))
        );

        assert_eq!(ledger.fetch_vault_balance(&snapshot.root()).await.unwrap(), Some(500));
        let commitment = ledger.fetch_commitment(&snapshot.root()).await.unwrap().unwrap();
        assert_eq!(commitment.migrated_amount, 1_000);
    }

    #[tokio::test]
    async fn test_submit_reverifies_proof() {
        let scheme = CommitmentScheme::Sha256V1;
        let a = Address::new([1; 32]);
        let entries = HolderEntry::enumerate([(a, 1_000), (Address::new([2; 32]), 500)]).unwrap();
        let snapshot = Snapshot::build(scheme, &entries, 0).unwrap();

        let ledger = InMemoryLedger::new(scheme);
        ledger.anchor(snapshot.root(), 1_500).await.unwrap();
        ledger.fund_vault(&snapshot.root(), 1_500).await.unwrap();

        let mut inflated = instruction_for(&snapshot, a);
        inflated.amount = 1_400;
        assert_eq!(
            ledger.submit_claim(&inflated).await,
            Err(LedgerError::Rejected(ClaimRejection::InvalidProof))
        );
        assert_eq!(ledger.fetch_claim_record(&snapshot.root(), &a).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_anchor_twice_fails() {
        let ledger = InMemoryLedger::new(CommitmentScheme::Sha256V1);
        ledger.anchor([7; 32], 10).await.unwrap();
        assert_eq!(ledger.anchor([7; 32], 10).await, Err(LedgerError::AlreadyAnchored));
    }
}

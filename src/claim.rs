// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Claim domain types.
//!
//! The orchestrator that produces these lives in the node; the kernel only fixes
//! their shape and the retry classification, so every caller agrees on which
//! rejections are terminal.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::proof::Proof;
use crate::types::{digest::serde_hex, Address, Amount, Digest, HolderEntry};

/// Lifecycle of an anchored commitment on the destination ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStatus {
    Active,
    Paused,
    Finalized,
}

impl CommitmentStatus {
    pub fn is_active(self) -> bool {
        matches!(self, CommitmentStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommitmentStatus::Active => "active",
            CommitmentStatus::Paused => "paused",
            CommitmentStatus::Finalized => "finalized",
        }
    }
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination-side record for one anchored root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentRecord {
    #[serde(with = "serde_hex")]
    pub root: Digest,
    pub status: CommitmentStatus,
    pub total_supply: Amount,
    pub migrated_amount: Amount,
}

impl CommitmentRecord {
    pub fn new(root: Digest, total_supply: Amount) -> Self {
        Self {
            root,
            status: CommitmentStatus::Active,
            total_supply,
            migrated_amount: 0,
        }
    }

    pub fn remaining(&self) -> Amount {
        self.total_supply.saturating_sub(self.migrated_amount)
    }
}

/// Destination-side marker that an address has claimed under a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub address: Address,
    pub amount_claimed: Amount,
    pub claimed: bool,
}

/// Everything the transfer authority needs to execute one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInstruction {
    #[serde(with = "serde_hex")]
    pub root: Digest,
    pub address: Address,
    pub amount: Amount,
    pub position: u32,
    pub proof: Proof,
}

impl ClaimInstruction {
    pub fn holder(&self) -> HolderEntry {
        HolderEntry::new(self.address, self.amount, self.position)
    }
}

/// Why a claim was not authorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ClaimRejection {
    /// Root not anchored yet. May resolve once anchoring completes.
    CommitmentNotFound,
    /// Anchored but paused or finalized. Only an administrator can change it.
    CommitmentInactive { status: CommitmentStatus },
    AlreadyClaimed,
    InvalidProof,
    /// Vault below the claimed amount. Reserves can be topped up.
    InsufficientReserve { available: Amount, required: Amount },
}

impl ClaimRejection {
    pub fn reason_code(&self) -> &'static str {
        match self {
            ClaimRejection::CommitmentNotFound => "commitment_not_found",
            ClaimRejection::CommitmentInactive { .. } => "commitment_inactive",
            ClaimRejection::AlreadyClaimed => "already_claimed",
            ClaimRejection::InvalidProof => "invalid_proof",
            ClaimRejection::InsufficientReserve { .. } => "insufficient_reserve",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClaimRejection::CommitmentNotFound | ClaimRejection::InsufficientReserve { .. }
        )
    }

    /// Text safe to show the claimant. An invalid proof never says which input diverged.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClaimRejection::CommitmentNotFound => "snapshot is not anchored yet, try again later",
            ClaimRejection::CommitmentInactive { .. } => "snapshot is no longer accepting claims",
            ClaimRejection::AlreadyClaimed => "address has already claimed",
            ClaimRejection::InvalidProof => "address is not eligible",
            ClaimRejection::InsufficientReserve { .. } => "claim reserve is temporarily insufficient, try again later",
        }
    }
}

impl fmt::Display for ClaimRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimRejection::CommitmentInactive { status } => write!(f, "commitment inactive ({status})"),
            ClaimRejection::InsufficientReserve { available, required } => {
                write!(f, "insufficient reserve: {available} available, {required} required")
            }
            other => f.write_str(other.reason_code()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    Ready(ClaimInstruction),
    Rejected(ClaimRejection),
}

impl ClaimDecision {
    pub fn is_ready(&self) -> bool {
        matches!(self, ClaimDecision::Ready(_))
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            ClaimDecision::Ready(_) => "ready",
            ClaimDecision::Rejected(rejection) => rejection.reason_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(ClaimRejection::CommitmentNotFound.is_retryable());
        assert!(ClaimRejection::InsufficientReserve { available: 0, required: 1 }.is_retryable());
        assert!(!ClaimRejection::CommitmentInactive { status: CommitmentStatus::Paused }.is_retryable());
        assert!(!ClaimRejection::AlreadyClaimed.is_retryable());
        assert!(!ClaimRejection::InvalidProof.is_retryable());
    }

    #[test]
    fn test_invalid_proof_message_is_opaque() {
        assert_eq!(ClaimRejection::InvalidProof.user_message(), "address is not eligible");
    }

    #[test]
    fn test_remaining_supply() {
        let mut record = CommitmentRecord::new([0u8; 32], 1_000);
        record.migrated_amount = 400;
        assert_eq!(record.remaining(), 600);
        assert!(record.status.is_active());
    }
}

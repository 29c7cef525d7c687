// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cache versus ledger reconciliation.
//!
//! Any cached view of "is this root active" or "has this address claimed" is
//! advisory. [`reconcile`] compares it with a fresh ledger observation and
//! always hands back the live state as the authority. A missing or stale cache
//! value is reported as drift, never assumed true or false.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::claim::{CommitmentRecord, CommitmentStatus};
use crate::types::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation<T> {
    Known(T),
    Unknown,
}

impl<T> Observation<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Observation::Known(value) => Some(value),
            Observation::Unknown => None,
        }
    }
}

impl<T> Default for Observation<T> {
    fn default() -> Self {
        Observation::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentState {
    NotAnchored,
    Active,
    Inactive(CommitmentStatus),
}

impl CommitmentState {
    pub fn from_record(record: Option<&CommitmentRecord>) -> Self {
        match record {
            None => CommitmentState::NotAnchored,
            Some(r) if r.status.is_active() => CommitmentState::Active,
            Some(r) => CommitmentState::Inactive(r.status),
        }
    }
}

/// Advisory view, e.g. a local cache or an indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CachedClaimView {
    pub commitment: Observation<CommitmentState>,
    pub claimed: Observation<bool>,
    /// Unix seconds.
    pub observed_at: u64,
}

impl CachedClaimView {
    pub fn from_live(live: &LiveClaimState) -> Self {
        Self {
            commitment: Observation::Known(live.commitment),
            claimed: Observation::Known(live.claimed),
            observed_at: live.observed_at,
        }
    }
}

/// Fresh read of the destination ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveClaimState {
    pub commitment: CommitmentState,
    pub claimed: bool,
    pub vault_balance: Option<Amount>,
    /// Unix seconds.
    pub observed_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    CommitmentUnknown,
    ClaimUnknown,
    Stale { age_secs: u64, max_age_secs: u64 },
    Commitment { cached: CommitmentState, live: CommitmentState },
    Claim { cached: bool, live: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncVerdict {
    pub in_sync: bool,
    pub drift: Vec<Drift>,
    pub authoritative: LiveClaimState,
}

pub fn reconcile(cached: &CachedClaimView, live: LiveClaimState, max_age_secs: u64) -> SyncVerdict {
    let mut drift = Vec::new();

    let age_secs = live.observed_at.saturating_sub(cached.observed_at);
    if age_secs > max_age_secs {
        drift.push(Drift::Stale { age_secs, max_age_secs });
    }

    match cached.commitment {
        Observation::Unknown => drift.push(Drift::CommitmentUnknown),
        Observation::Known(state) if state != live.commitment => drift.push(Drift::Commitment {
            cached: state,
            live: live.commitment,
        }),
        Observation::Known(_) => {}
    }

    match cached.claimed {
        Observation::Unknown => drift.push(Drift::ClaimUnknown),
        Observation::Known(claimed) if claimed != live.claimed => drift.push(Drift::Claim {
            cached: claimed,
            live: live.claimed,
        }),
        Observation::Known(_) => {}
    }

    SyncVerdict {
        in_sync: drift.is_empty(),
        drift,
        authoritative: live,
    }
}

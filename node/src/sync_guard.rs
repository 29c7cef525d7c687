// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cache and live-state guard.
//!
//! [`ClaimCache`] is what the node remembers between requests. It is never
//! consulted to authorize anything: [`StateSyncGuard::check`] always re-reads
//! the ledger, reconciles, and overwrites the cache with what the ledger said.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use snapclaim_kernel::sync::{reconcile, CachedClaimView, CommitmentState, LiveClaimState, Observation, SyncVerdict};
use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::{Address, Digest};
use tokio::sync::RwLock;

use crate::errors::NodeError;
use crate::ledger::DestinationLedger;

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Advisory view of claim state, keyed by `(root, address)`.
#[derive(Default)]
pub struct ClaimCache {
    entries: RwLock<HashMap<(Digest, Address), CachedClaimView>>,
}

impl ClaimCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown on a miss, never a guess.
    pub async fn get(&self, root: &Digest, address: &Address) -> CachedClaimView {
        self.entries
            .read()
            .await
            .get(&(*root, *address))
            .copied()
            .unwrap_or_default()
    }

    pub async fn record(&self, root: Digest, address: Address, view: CachedClaimView) {
        self.entries.write().await.insert((root, address), view);
    }

    pub async fn record_live(&self, root: Digest, address: Address, live: &LiveClaimState) {
        self.record(root, address, CachedClaimView::from_live(live)).await;
    }

    /// After a submission the ledger has recorded the claim, whatever the cache said.
    pub async fn mark_claimed(&self, root: Digest, address: Address) {
        let mut entries = self.entries.write().await;
        let view = entries.entry((root, address)).or_default();
        view.commitment = Observation::Known(CommitmentState::Active);
        view.claimed = Observation::Known(true);
        view.observed_at = unix_now();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

pub struct StateSyncGuard<L> {
    ledger: Arc<L>,
    cache: Arc<ClaimCache>,
    max_age_secs: u64,
}

impl<L: DestinationLedger> StateSyncGuard<L> {
    pub fn new(ledger: Arc<L>, cache: Arc<ClaimCache>, max_age_secs: u64) -> Self {
        Self {
            ledger,
            cache,
            max_age_secs,
        }
    }

    pub fn cache(&self) -> &Arc<ClaimCache> {
        &self.cache
    }

    /// Fresh read of everything the claim path depends on.
    pub async fn live_state(&self, root: &Digest, address: &Address) -> Result<LiveClaimState, NodeError> {
        let started = Instant::now();
        let (commitment, claim, vault) = tokio::try_join!(
            self.ledger.fetch_commitment(root),
            self.ledger.fetch_claim_record(root, address),
            self.ledger.fetch_vault_balance(root),
        )?;
        metrics::histogram!(
            "snapclaim_ledger_request_duration_seconds",
            started.elapsed().as_secs_f64(),
            "op" => "live_state"
        );

        Ok(LiveClaimState {
            commitment: CommitmentState::from_record(commitment.as_ref()),
            claimed: claim.is_some(),
            vault_balance: vault,
            observed_at: unix_now(),
        })
    }

    /// Reconciles the cache against the ledger and refreshes it.
    pub async fn check(&self, root: &Digest, address: &Address) -> Result<SyncVerdict, NodeError> {
        let cached = self.cache.get(root, address).await;
        let live = self.live_state(root, address).await?;
        let verdict = reconcile(&cached, live, self.max_age_secs);

        if !verdict.in_sync {
            tracing::warn!(
                "Claim cache drift for {} under {}: {:?}",
                address,
                digest_to_hex(root),
                verdict.drift
            );
            metrics::counter!("snapclaim_sync_drift_total", 1);
        }

        self.cache.record_live(*root, *address, &verdict.authoritative).await;
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use snapclaim_kernel::sync::Drift;
    use snapclaim_kernel::CommitmentScheme;

    #[tokio::test]
    async fn test_first_check_is_unknown_then_in_sync() {
        let ledger = Arc::new(InMemoryLedger::new(CommitmentScheme::Sha256V1));
        ledger.anchor([1; 32], 100).await.unwrap();
        let guard = StateSyncGuard::new(ledger, Arc::new(ClaimCache::new()), 60);
        let address = Address::new([2; 32]);

        let first = guard.check(&[1; 32], &address).await.unwrap();
        assert!(!first.in_sync);
        assert!(first.drift.contains(&Drift::CommitmentUnknown));
        assert_eq!(first.authoritative.commitment, CommitmentState::Active);
        assert_eq!(first.authoritative.vault_balance, None);

        let second = guard.check(&[1; 32], &address).await.unwrap();
        assert!(second.in_sync, "{:?}", second.drift);
    }

    #[tokio::test]
    async fn test_cache_saying_unclaimed_is_overruled() {
        let ledger = Arc::new(InMemoryLedger::new(CommitmentScheme::Sha256V1));
        let cache = Arc::new(ClaimCache::new());
        let address = Address::new([2; 32]);
        cache
            .record(
                [1; 32],
                address,
                CachedClaimView {
                    commitment: Observation::Known(CommitmentState::Active),
                    claimed: Observation::Known(false),
                    observed_at: unix_now(),
                },
            )
            .await;

        let guard = StateSyncGuard::new(ledger, cache.clone(), 60);
        let verdict = guard.check(&[1; 32], &address).await.unwrap();
        assert!(!verdict.in_sync);
        assert_eq!(verdict.authoritative.commitment, CommitmentState::NotAnchored);
        assert_eq!(
            cache.get(&[1; 32], &address).await.commitment,
            Observation::Known(CommitmentState::NotAnchored)
        );
    }
}

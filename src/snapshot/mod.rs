// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Holder snapshots and their distributable forms.
//!
//! A [`Snapshot`] is the root plus, for every holder, the `(amount, position,
//! proof)` needed to claim. Only the root has to be anchored on the destination
//! ledger; everything else can be rebuilt from the holder list.

pub mod encode;
pub mod decode;
pub mod payload;
pub mod blake3;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::config::CommitmentScheme;
use crate::error::{KernelError, Result};
use crate::leaf::{leaf_for, validate_entries};
use crate::proof::Proof;
use crate::tree::MerkleTree;
use crate::types::{Address, Amount, Digest, HolderEntry};
use crate::verify::verify;

pub use payload::{ClaimPayload, SnapshotPayload};

/// What one holder needs to claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEntry {
    pub amount: Amount,
    pub position: u32,
    pub proof: Proof,
}

impl ClaimEntry {
    pub fn holder(&self, address: Address) -> HolderEntry {
        HolderEntry::new(address, self.amount, self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    scheme: CommitmentScheme,
    root: Digest,
    entries: BTreeMap<Address, ClaimEntry>,
    /// Unix seconds, supplied by the caller.
    created_at: u64,
}

impl Snapshot {
    /// Builds the tree over `entries` and records every holder's proof.
    pub fn build(scheme: CommitmentScheme, entries: &[HolderEntry], created_at: u64) -> Result<Self> {
        let ordered = validate_entries(entries)?;
        let leaves = ordered.iter().map(|e| leaf_for(scheme, e)).collect();
        let tree = MerkleTree::from_leaves(scheme, leaves);

        let mut claims = BTreeMap::new();
        for entry in &ordered {
            let proof = tree.proof(entry.position as usize)?;
            claims.insert(
                entry.address,
                ClaimEntry {
                    amount: entry.amount,
                    position: entry.position,
                    proof,
                },
            );
        }

        Ok(Self {
            scheme,
            root: tree.root(),
            entries: claims,
            created_at,
        })
    }

    /// Assembles a snapshot from distributed data without rebuilding the tree.
    ///
    /// Proofs are taken as published; [`Snapshot::audit`] checks them.
    pub fn from_parts(
        scheme: CommitmentScheme,
        root: Digest,
        entries: BTreeMap<Address, ClaimEntry>,
        created_at: u64,
    ) -> Result<Self> {
        let holders: Vec<HolderEntry> = entries.iter().map(|(a, c)| c.holder(*a)).collect();
        validate_entries(&holders)?;
        Ok(Self {
            scheme,
            root,
            entries,
            created_at,
        })
    }

    pub fn scheme(&self) -> CommitmentScheme {
        self.scheme
    }

    pub fn root(&self) -> Digest {
        self.root
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn claim(&self, address: &Address) -> Option<&ClaimEntry> {
        self.entries.get(address)
    }

    pub fn claim_or_err(&self, address: &Address) -> Result<&ClaimEntry> {
        self.claim(address)
            .ok_or_else(|| KernelError::UnknownAddress(address.to_base58()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Address, &ClaimEntry)> {
        self.entries.iter()
    }

    /// Holder list in position order (the tree's leaf order).
    pub fn holders(&self) -> Vec<HolderEntry> {
        let mut holders: Vec<HolderEntry> = self.entries.iter().map(|(a, c)| c.holder(*a)).collect();
        holders.sort_by_key(|h| h.position);
        holders
    }

    pub fn total_amount(&self) -> Result<Amount> {
        self.entries
            .values()
            .try_fold(0u64, |acc, c| acc.checked_add(c.amount))
            .ok_or(KernelError::AmountOverflow)
    }

    /// Rebuilds the tree from the holder list and checks it lands on the root.
    ///
    /// Stricter than [`Snapshot::audit`]: proofs from a tree padded any other
    /// way can still fold to their own root.
    pub fn check_root(&self) -> Result<()> {
        let tree = MerkleTree::build(self.scheme, &self.holders())?;
        if tree.root() != self.root {
            return Err(KernelError::RootMismatch);
        }
        Ok(())
    }

    /// Re-verifies every entry against the root; returns the ones that fail.
    pub fn audit(&self) -> Vec<Address> {
        self.entries
            .iter()
            .filter(|(address, claim)| !verify(self.scheme, &claim.holder(**address), &claim.proof, &self.root))
            .map(|(address, _)| *address)
            .collect()
    }
}

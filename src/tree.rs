// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot Merkle tree.
//!
//! # Construction
//! ```text
//! level 0      : leaves in position order
//! level k + 1  : H(min(a, b) || max(a, b)) for adjacent pairs of level k
//!                odd level -> last node is paired with itself
//! root         : the single node of the top level
//! ```
//! One leaf means the root is that leaf (no internal hashing). No leaves means
//! the root is the scheme's digest of the empty input.
//!
//! Every level is kept so proofs for all holders come out of one build.

use alloc::vec::Vec;

use crate::config::CommitmentScheme;
use crate::error::{KernelError, Result};
use crate::hash::{empty_root, hash_pair};
use crate::leaf::{leaf_for, validate_entries};
use crate::proof::Proof;
use crate::types::{Digest, HolderEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    scheme: CommitmentScheme,
    /// `levels[0]` holds the leaves, the last level holds the root.
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Validates `entries` and builds the tree over them in position order.
    pub fn build(scheme: CommitmentScheme, entries: &[HolderEntry]) -> Result<Self> {
        let ordered = validate_entries(entries)?;
        let leaves = ordered.iter().map(|e| leaf_for(scheme, e)).collect();
        Ok(Self::from_leaves(scheme, leaves))
    }

    /// Builds over leaves that are already encoded and ordered.
    pub fn from_leaves(scheme: CommitmentScheme, leaves: Vec<Digest>) -> Self {
        let mut levels = Vec::new();
        levels.push(leaves);

        while levels.last().map_or(false, |level| level.len() > 1) {
            let current = &levels[levels.len() - 1];
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    hash_pair(scheme, left, right)
                })
                .collect();
            levels.push(next);
        }

        Self { scheme, levels }
    }

    pub fn scheme(&self) -> CommitmentScheme {
        self.scheme
    }

    pub fn root(&self) -> Digest {
        match self.levels.last().and_then(|top| top.first()) {
            Some(root) => *root,
            None => empty_root(self.scheme),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Number of hashing levels above the leaves (the proof length).
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn leaf(&self, index: usize) -> Option<Digest> {
        self.levels.first().and_then(|leaves| leaves.get(index)).copied()
    }

    /// Sibling path from leaf `index` up to (excluding) the root.
    pub fn proof(&self, index: usize) -> Result<Proof> {
        let len = self.leaf_count();
        if index >= len {
            return Err(KernelError::LeafOutOfRange { index, len });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut cursor = index;
        for level in &self.levels[..self.depth()] {
            let sibling = cursor ^ 1;
            // Padding: the last node of an odd level is its own partner.
            let node = level.get(sibling).unwrap_or(&level[cursor]);
            siblings.push(*node);
            cursor >>= 1;
        }

        Ok(Proof::new(siblings))
    }

    /// Proofs for every leaf, in position order.
    pub fn proofs(&self) -> Vec<Proof> {
        (0..self.leaf_count())
            .filter_map(|index| self.proof(index).ok())
            .collect()
    }
}

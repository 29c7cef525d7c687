// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic proof verification.
//!
//! This is the same pure function the destination program runs:
//! ```text
//! acc = leaf(address, amount, position)
//! for sibling in proof: acc = H(min(acc, sibling) || max(acc, sibling))
//! valid = acc == root
//! ```
//! Off-chain pre-checks and the on-chain check are two instances of it and must
//! never diverge. A mismatch is `false`, not an error.

use crate::config::CommitmentScheme;
use crate::error::Result;
use crate::hash::hash_pair;
use crate::leaf::{encode_leaf, leaf_for};
use crate::proof::Proof;
use crate::types::{digest_from_hex, parse_amount, Address, Digest, HolderEntry};

/// Folds `proof` into `leaf` and returns the reconstructed root.
pub fn fold_proof(scheme: CommitmentScheme, leaf: Digest, proof: &Proof) -> Digest {
    proof
        .siblings()
        .iter()
        .fold(leaf, |acc, sibling| hash_pair(scheme, &acc, sibling))
}

pub fn verify_leaf(scheme: CommitmentScheme, leaf: Digest, proof: &Proof, root: &Digest) -> bool {
    fold_proof(scheme, leaf, proof) == *root
}

pub fn verify(scheme: CommitmentScheme, entry: &HolderEntry, proof: &Proof, root: &Digest) -> bool {
    verify_leaf(scheme, leaf_for(scheme, entry), proof, root)
}

/// Verifies a claim exactly as it arrives over the wire.
///
/// Malformed shapes (address width, non-numeric amount, digest width) are
/// errors; a well-formed claim that does not reconstruct the root is `Ok(false)`.
pub fn verify_encoded<S: AsRef<str>>(
    scheme: CommitmentScheme,
    address: &str,
    amount: &str,
    position: u32,
    proof: &[S],
    root: &str,
) -> Result<bool> {
    let address = Address::parse(address)?;
    let amount = parse_amount(amount)?;
    let proof = Proof::from_hex(proof)?;
    let root = digest_from_hex(root)?;

    let leaf = encode_leaf(scheme, &address, amount, position);
    Ok(verify_leaf(scheme, leaf, &proof, &root))
}

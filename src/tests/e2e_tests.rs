// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Pinned end-to-end vectors.
//!
//! Holder `i` has address `[i + 1; 32]` and position `i`. Changing any of these
//! constants means the commitment format changed and every anchored root would
//! stop verifying.

use super::holders;
use crate::config::CommitmentScheme;
use crate::leaf::leaf_for;
use crate::snapshot::Snapshot;
use crate::types::{digest_from_hex, digest_to_hex};
use crate::verify::{verify, verify_encoded};

const AMOUNTS: [u64; 4] = [100, 250, 84021, 5];

const SHA256_ROOT: &str = "2286a27ac5ccb51c570108d0cfa3a745eec98762906a9bf69ab0aa19ae13aaaf";
const SHA256_LEAF_0: &str = "ce05f0d0e3cbc2706041609724229c0c1da72cacdb2d245bf16e97ebd3d35847";
const KECCAK256_ROOT: &str = "9bf04130d3db5dd6cf8f3e3c0613126610adddeb45d63024093c4a2c7839c7bb";

#[test]
fn test_sha256_four_holder_root() {
    let entries = holders(&AMOUNTS);
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &entries, 0).unwrap();

    assert_eq!(digest_to_hex(&leaf_for(CommitmentScheme::Sha256V1, &entries[0])), SHA256_LEAF_0);
    assert_eq!(digest_to_hex(&snapshot.root()), SHA256_ROOT);

    let root = digest_from_hex(SHA256_ROOT).unwrap();
    for entry in &entries {
        let claim = snapshot.claim(&entry.address).unwrap();
        assert_eq!(claim.proof.len(), 2);
        assert!(verify(CommitmentScheme::Sha256V1, entry, &claim.proof, &root));
    }
}

#[test]
fn test_keccak256_four_holder_root() {
    let entries = holders(&AMOUNTS);
    let snapshot = Snapshot::build(CommitmentScheme::Keccak256V1, &entries, 0).unwrap();
    assert_eq!(digest_to_hex(&snapshot.root()), KECCAK256_ROOT);
    assert!(snapshot.audit().is_empty());
}

#[test]
fn test_published_payload_verifies_from_text() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&AMOUNTS), 0).unwrap();
    let payload = snapshot.to_payload();
    assert_eq!(payload.root, SHA256_ROOT);

    for (address, claim) in &payload.claims {
        let ok = verify_encoded(
            CommitmentScheme::Sha256V1,
            address,
            &claim.amount,
            claim.index,
            &claim.proof[..],
            &payload.root,
        )
        .unwrap();
        assert!(ok, "{address}");
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::string::ToString;
use std::vec::Vec;

use super::holders;
use crate::config::CommitmentScheme;
use crate::error::KernelError;
use crate::snapshot::decode::decode_snapshot;
use crate::snapshot::encode::encode_snapshot;
use crate::hash::hash_pair;
use crate::leaf::leaf_for;
use crate::proof::Proof;
use crate::snapshot::{ClaimEntry, Snapshot};
use crate::types::{Address, HolderEntry};

#[test]
fn test_snapshot_claims_and_totals() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[10, 20, 30]), 1_700_000_000).unwrap();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.total_amount(), Ok(60));
    assert_eq!(snapshot.created_at(), 1_700_000_000);

    let second = Address::new([2; 32]);
    let claim = snapshot.claim(&second).unwrap();
    assert_eq!((claim.amount, claim.position), (20, 1));
    assert!(snapshot.claim(&Address::new([9; 32])).is_none());
    assert!(matches!(
        snapshot.claim_or_err(&Address::new([9; 32])),
        Err(KernelError::UnknownAddress(_))
    ));
    assert!(snapshot.audit().is_empty());
}

#[test]
fn test_total_amount_overflow() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[u64::MAX, 1]), 0).unwrap();
    assert_eq!(snapshot.total_amount(), Err(KernelError::AmountOverflow));
    assert!(snapshot.to_payload().total_tokens.is_none());
}

#[test]
fn test_rejects_bad_holder_lists() {
    let mut dup_address = holders(&[1, 2]);
    dup_address[1].address = dup_address[0].address;
    assert!(matches!(
        Snapshot::build(CommitmentScheme::Sha256V1, &dup_address, 0),
        Err(KernelError::DuplicateAddress(_))
    ));

    let mut dup_position = holders(&[1, 2]);
    dup_position[1].position = 0;
    assert_eq!(
        Snapshot::build(CommitmentScheme::Sha256V1, &dup_position, 0),
        Err(KernelError::DuplicatePosition(0))
    );

    let gap = vec![
        HolderEntry::new(Address::new([1; 32]), 5, 0),
        HolderEntry::new(Address::new([2; 32]), 5, 2),
    ];
    assert_eq!(
        Snapshot::build(CommitmentScheme::Sha256V1, &gap, 0),
        Err(KernelError::NonContiguousPosition { expected: 1, found: 2 })
    );
}

#[test]
fn test_empty_snapshot() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &[], 0).unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.root(), crate::hash::empty_root(CommitmentScheme::Sha256V1));
    assert_eq!(snapshot.total_amount(), Ok(0));
}

#[test]
fn test_payload_round_trip_and_audit() {
    let snapshot = Snapshot::build(CommitmentScheme::Keccak256V1, &holders(&[7, 8, 9, 10, 11]), 42).unwrap();
    let payload = snapshot.to_payload();
    assert_eq!(payload.claim_count, Some(5));
    assert_eq!(payload.total_tokens.as_deref(), Some("45"));
    assert!(!payload.root.starts_with("0x"));
    assert!(payload.claims.values().all(|c| c.proof.iter().all(|p| p.starts_with("0x"))));

    let parsed = Snapshot::from_payload(&payload, CommitmentScheme::Sha256V1).unwrap();
    assert_eq!(parsed, snapshot);
    assert!(parsed.audit().is_empty());
}

#[test]
fn test_payload_scheme_mismatch() {
    let snapshot = Snapshot::build(CommitmentScheme::Keccak256V1, &holders(&[1, 2]), 0).unwrap();
    let payload = snapshot.to_payload();
    assert_eq!(
        Snapshot::from_payload_expecting(&payload, CommitmentScheme::Sha256V1),
        Err(KernelError::SchemeMismatch { expected: "sha256-v1", found: "keccak256-v1" })
    );
}

#[test]
fn test_audit_flags_tampered_payload_entries() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[100, 200, 300]), 0).unwrap();
    let mut payload = snapshot.to_payload();
    let victim = Address::new([3; 32]).to_base58();
    payload.claims.get_mut(&victim).unwrap().amount = "3000".to_string();

    let parsed = Snapshot::from_payload(&payload, CommitmentScheme::Sha256V1).unwrap();
    assert_eq!(parsed.audit(), vec![Address::new([3; 32])]);
}

/// Three holders committed with the odd leaf promoted instead of duplicated.
fn promoted_odd_snapshot(scheme: CommitmentScheme) -> Snapshot {
    let entries = holders(&[100, 250, 84021]);
    let l: Vec<_> = entries.iter().map(|e| leaf_for(scheme, e)).collect();
    let left = hash_pair(scheme, &l[0], &l[1]);
    let root = hash_pair(scheme, &left, &l[2]);
    let proofs = [vec![l[1], l[2]], vec![l[0], l[2]], vec![left]];

    let claims = entries
        .iter()
        .zip(proofs)
        .map(|(e, siblings)| {
            let entry = ClaimEntry {
                amount: e.amount,
                position: e.position,
                proof: Proof::new(siblings),
            };
            (e.address, entry)
        })
        .collect();
    Snapshot::from_parts(scheme, root, claims, 0).unwrap()
}

#[test]
fn test_check_root_refuses_other_padding() {
    let promoted = promoted_odd_snapshot(CommitmentScheme::Sha256V1);
    // Every proof folds to its own root.
    assert!(promoted.audit().is_empty());
    assert_eq!(promoted.check_root(), Err(KernelError::RootMismatch));

    // Which is why it could never be restored from an artifact.
    let bytes = encode_snapshot(&promoted).unwrap();
    assert_eq!(decode_snapshot(&bytes), Err(KernelError::RootMismatch));

    let built = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[100, 250, 84021]), 0).unwrap();
    assert_eq!(built.check_root(), Ok(()));
}

#[test]
fn test_payload_rejects_malformed_fields() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[1, 2]), 0).unwrap();

    let mut bad_root = snapshot.to_payload();
    bad_root.root = "1234".to_string();
    assert!(matches!(
        Snapshot::from_payload(&bad_root, CommitmentScheme::Sha256V1),
        Err(KernelError::InvalidDigestLength { .. })
    ));

    let mut bad_amount = snapshot.to_payload();
    for claim in bad_amount.claims.values_mut() {
        claim.amount = "-1".to_string();
    }
    assert!(matches!(
        Snapshot::from_payload(&bad_amount, CommitmentScheme::Sha256V1),
        Err(KernelError::InvalidAmount(_))
    ));
}

#[test]
fn test_payload_json_shape() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[5]), 9).unwrap();
    let json = serde_json::to_value(snapshot.to_payload()).unwrap();
    let key = Address::new([1; 32]).to_base58();
    assert_eq!(json["claims"][key.as_str()]["amount"], "5");
    assert_eq!(json["claims"][key.as_str()]["index"], 0);
    assert_eq!(json["scheme"], "sha256-v1");
    assert_eq!(json["createdAt"], 9);
    assert_eq!(json["claimCount"], 1);
}

#[test]
fn test_artifact_round_trip() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[100, 250, 84021, 5]), 1_234).unwrap();
    let bytes = encode_snapshot(&snapshot).unwrap();
    assert_eq!(&bytes[..4], b"SNCL");
    assert_eq!(decode_snapshot(&bytes), Ok(snapshot));
}

#[test]
fn test_artifact_rejects_corruption() {
    let snapshot = Snapshot::build(CommitmentScheme::Sha256V1, &holders(&[1, 2, 3]), 0).unwrap();
    let bytes = encode_snapshot(&snapshot).unwrap();

    let mut flipped = bytes.clone();
    flipped[20] ^= 0xFF;
    assert_eq!(decode_snapshot(&flipped), Err(KernelError::ChecksumMismatch));

    let truncated: Vec<u8> = bytes[..10].to_vec();
    assert!(matches!(decode_snapshot(&truncated), Err(KernelError::Truncated { .. })));

    // Re-seal a header with a foreign magic so only the magic check can fail.
    let mut foreign = bytes[..bytes.len() - 32].to_vec();
    foreign[..4].copy_from_slice(b"VALK");
    let checksum = crate::snapshot::blake3::artifact_checksum(&foreign);
    foreign.extend_from_slice(&checksum);
    assert_eq!(decode_snapshot(&foreign), Err(KernelError::InvalidMagic));
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::vec::Vec;

use super::holders;
use crate::config::CommitmentScheme;
use crate::error::KernelError;
use crate::hash::hash_parts;
use crate::leaf::{encode_leaf, leaf_for};
use crate::proof::Proof;
use crate::tree::MerkleTree;
use crate::types::{digest_to_hex, Address, HolderEntry};
use crate::verify::{verify, verify_encoded};

const SCHEMES: [CommitmentScheme; 2] = [CommitmentScheme::Sha256V1, CommitmentScheme::Keccak256V1];

fn amounts(n: usize) -> Vec<u64> {
    (0..n as u64).map(|i| 1_000 + i * 37).collect()
}

#[test]
fn test_every_proof_verifies() {
    for scheme in SCHEMES {
        for n in 1..=17 {
            let entries = holders(&amounts(n));
            let tree = MerkleTree::build(scheme, &entries).unwrap();
            let root = tree.root();
            for entry in &entries {
                let proof = tree.proof(entry.position as usize).unwrap();
                assert!(verify(scheme, entry, &proof, &root), "n={n} pos={}", entry.position);
            }
        }
    }
}

#[test]
fn test_single_holder_root_is_leaf() {
    for scheme in SCHEMES {
        let entries = holders(&[1_000]);
        let tree = MerkleTree::build(scheme, &entries).unwrap();
        let e = &entries[0];
        assert_eq!(tree.root(), encode_leaf(scheme, &e.address, e.amount, e.position));

        let proof = tree.proof(0).unwrap();
        assert!(proof.is_empty());
        assert!(verify(scheme, e, &proof, &tree.root()));
    }
}

#[test]
fn test_odd_levels_verify() {
    // 3 pads level 0; 5 pads levels 0 and 1.
    for n in [3usize, 5] {
        for scheme in SCHEMES {
            let entries = holders(&amounts(n));
            let tree = MerkleTree::build(scheme, &entries).unwrap();
            assert_eq!(tree.depth(), if n == 3 { 2 } else { 3 });
            for entry in &entries {
                let proof = tree.proof(entry.position as usize).unwrap();
                assert!(verify(scheme, entry, &proof, &tree.root()));
            }
        }
    }
}

#[test]
fn test_mutated_inputs_fail() {
    let scheme = CommitmentScheme::Sha256V1;
    let entries = holders(&amounts(6));
    let tree = MerkleTree::build(scheme, &entries).unwrap();
    let root = tree.root();
    let entry = entries[2];
    let proof = tree.proof(2).unwrap();

    for byte in 0..32 {
        let mut bytes = *entry.address.as_bytes();
        bytes[byte] ^= 0x01;
        let mutated = HolderEntry::new(Address::new(bytes), entry.amount, entry.position);
        assert!(!verify(scheme, &mutated, &proof, &root));
    }

    for byte in 0..8 {
        let mutated = HolderEntry::new(entry.address, entry.amount ^ (1u64 << (byte * 8)), entry.position);
        assert!(!verify(scheme, &mutated, &proof, &root));
    }

    let moved = HolderEntry::new(entry.address, entry.amount, 3);
    assert!(!verify(scheme, &moved, &proof, &root));

    for element in 0..proof.len() {
        for byte in 0..32 {
            let mut siblings = proof.siblings().to_vec();
            siblings[element][byte] ^= 0x80;
            assert!(!verify(scheme, &entry, &Proof::new(siblings), &root));
        }
    }

    let mut truncated = proof.siblings().to_vec();
    truncated.pop();
    assert!(!verify(scheme, &entry, &Proof::new(truncated), &root));

    let mut wrong_root = root;
    wrong_root[31] ^= 0x01;
    assert!(!verify(scheme, &entry, &proof, &wrong_root));
}

#[test]
fn test_pairing_is_order_independent() {
    for scheme in SCHEMES {
        let entries = holders(&amounts(8));
        let tree = MerkleTree::build(scheme, &entries).unwrap();

        for entry in &entries {
            let proof = tree.proof(entry.position as usize).unwrap();
            // Fold with the sibling placed first, sorting left to the combinator.
            let mut acc = leaf_for(scheme, entry);
            for sibling in proof.siblings() {
                let (lo, hi) = if sibling <= &acc { (sibling, &acc) } else { (&acc, sibling) };
                acc = hash_parts(scheme, &[lo.as_slice(), hi.as_slice()]);
            }
            assert_eq!(acc, tree.root());

            // The combinator itself ignores argument order.
            let mut acc = leaf_for(scheme, entry);
            for sibling in proof.siblings() {
                acc = crate::hash::hash_pair(scheme, sibling, &acc);
            }
            assert_eq!(acc, tree.root());
        }
    }
}

#[test]
fn test_verify_encoded_wire_forms() {
    let scheme = CommitmentScheme::Sha256V1;
    let entries = holders(&amounts(4));
    let tree = MerkleTree::build(scheme, &entries).unwrap();
    let entry = entries[1];
    let proof = tree.proof(1).unwrap().to_hex();
    let root = digest_to_hex(&tree.root());

    let base58 = entry.address.to_base58();
    let hex_address = std::format!("0x{}", entry.address.to_hex());
    let amount = std::format!("{}", entry.amount);

    assert_eq!(verify_encoded(scheme, &base58, &amount, 1, &proof[..], &root), Ok(true));
    assert_eq!(verify_encoded(scheme, &hex_address, &amount, 1, &proof[..], &root), Ok(true));
    assert_eq!(verify_encoded(scheme, &base58, "1", 1, &proof[..], &root), Ok(false));

    assert!(matches!(
        verify_encoded(scheme, &base58, "12a", 1, &proof[..], &root),
        Err(KernelError::InvalidAmount(_))
    ));
    assert!(matches!(
        verify_encoded(scheme, &base58, &amount, 1, &proof[..], "abcd"),
        Err(KernelError::InvalidDigestLength { expected: 32, found: 2 })
    ));
    assert!(matches!(
        verify_encoded(scheme, "0x0102", &amount, 1, &proof[..], &root),
        Err(KernelError::InvalidAddressLength { expected: 32, found: 2 })
    ));
    let bad_proof = ["0xzz"];
    assert_eq!(
        verify_encoded(scheme, &base58, &amount, 1, &bad_proof, &root),
        Err(KernelError::InvalidHex)
    );
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canonical hash primitives.
//!
//! All commitment hashing goes through this module so the digest function is
//! picked once, by [`CommitmentScheme`], and never by a library default.
//!
//! # Pairing
//! ```text
//! parent = H(min(a, b) || max(a, b))
//! ```
//! Ordering is plain lexicographic comparison of the 32 raw bytes. A node that
//! is its own pair partner (odd level padding) hashes as `H(x || x)`.

use sha2::{Digest as _, Sha256};
use sha3::Keccak256;

use crate::config::{CommitmentScheme, DIGEST_LEN};
use crate::types::Digest;

/// Hashes the concatenation of `parts` in one pass.
pub fn hash_parts(scheme: CommitmentScheme, parts: &[&[u8]]) -> Digest {
    match scheme {
        CommitmentScheme::Sha256V1 => {
            let mut hasher = Sha256::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().into()
        }
        CommitmentScheme::Keccak256V1 => {
            let mut hasher = Keccak256::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().into()
        }
    }
}

pub fn hash_bytes(scheme: CommitmentScheme, data: &[u8]) -> Digest {
    hash_parts(scheme, &[data])
}

/// Commutative parent of two nodes.
pub fn hash_pair(scheme: CommitmentScheme, a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; DIGEST_LEN * 2];
    buf[..DIGEST_LEN].copy_from_slice(lo);
    buf[DIGEST_LEN..].copy_from_slice(hi);
    hash_bytes(scheme, &buf)
}

/// Root of a snapshot with no holders: the digest of the empty input.
pub fn empty_root(scheme: CommitmentScheme) -> Digest {
    hash_bytes(scheme, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256("abc")
        let expected = hex::decode("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad").unwrap();
        assert_eq!(hash_bytes(CommitmentScheme::Sha256V1, b"abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_keccak_known_vector() {
        // Keccak-256("") (pre-NIST padding, as used by EVM tooling)
        let expected = hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470").unwrap();
        assert_eq!(empty_root(CommitmentScheme::Keccak256V1).as_slice(), expected.as_slice());
    }

    #[test]
    fn test_hash_parts_matches_concatenation() {
        let joined = hash_bytes(CommitmentScheme::Sha256V1, b"helloworld");
        let parts = hash_parts(CommitmentScheme::Sha256V1, &[b"hello", b"world"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_pair_is_commutative() {
        let a = hash_bytes(CommitmentScheme::Sha256V1, &[1]);
        let b = hash_bytes(CommitmentScheme::Sha256V1, &[2]);
        assert_eq!(
            hash_pair(CommitmentScheme::Sha256V1, &a, &b),
            hash_pair(CommitmentScheme::Sha256V1, &b, &a)
        );
        assert_ne!(
            hash_pair(CommitmentScheme::Sha256V1, &a, &b),
            hash_pair(CommitmentScheme::Keccak256V1, &a, &b)
        );
    }
}

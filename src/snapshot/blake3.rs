// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Artifact integrity hashing.
//!
//! BLAKE3 protects the snapshot *container* against corruption in storage or
//! transit. It is unrelated to the commitment hash: roots are always produced
//! by the scheme's digest function in [`crate::hash`].

use blake3;

pub const CHECKSUM_LEN: usize = 32;

/// BLAKE3 of the artifact bytes that precede the trailer.
pub fn artifact_checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    *blake3::hash(data).as_bytes()
}

/// Constant-time comparison against a stored trailer.
pub fn checksum_matches(data: &[u8], expected: &[u8; CHECKSUM_LEN]) -> bool {
    blake3::hash(data) == blake3::Hash::from(*expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_determinism() {
        let data = b"snapshot container";
        assert_eq!(artifact_checksum(data), artifact_checksum(data));
        assert!(checksum_matches(data, &artifact_checksum(data)));
        assert!(!checksum_matches(b"tampered container", &artifact_checksum(data)));
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Leaf encoding.
//!
//! # Leaf Preimage
//! ```text
//! Sha256V1:     address[32] | amount u64 LE        | position u32 LE   (44 bytes)
//! Keccak256V1:  address[32] | amount u256 BE       | position u32 LE   (68 bytes)
//! ```
//! The preimage is hashed exactly once with the scheme's digest function.

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::config::{CommitmentScheme, ADDRESS_LEN, POSITION_WIDTH, WIDE_AMOUNT_WIDTH};
use crate::error::{KernelError, Result};
use crate::hash::hash_bytes;
use crate::types::{Address, Amount, Digest, HolderEntry};

/// Fixed-width preimage of one leaf.
pub fn encode_leaf_bytes(scheme: CommitmentScheme, address: &Address, amount: Amount, position: u32) -> Vec<u8> {
    let mut buf = vec![0u8; scheme.leaf_width()];
    buf[..ADDRESS_LEN].copy_from_slice(address.as_bytes());

    let amount_end = ADDRESS_LEN + scheme.amount_width();
    match scheme {
        CommitmentScheme::Sha256V1 => {
            LittleEndian::write_u64(&mut buf[ADDRESS_LEN..amount_end], amount);
        }
        CommitmentScheme::Keccak256V1 => {
            // u64 right-aligned inside a 32-byte big-endian word
            let word = &mut buf[ADDRESS_LEN..amount_end];
            BigEndian::write_u64(&mut word[WIDE_AMOUNT_WIDTH - 8..], amount);
        }
    }

    LittleEndian::write_u32(&mut buf[amount_end..amount_end + POSITION_WIDTH], position);
    buf
}

pub fn encode_leaf(scheme: CommitmentScheme, address: &Address, amount: Amount, position: u32) -> Digest {
    hash_bytes(scheme, &encode_leaf_bytes(scheme, address, amount, position))
}

pub fn leaf_for(scheme: CommitmentScheme, entry: &HolderEntry) -> Digest {
    encode_leaf(scheme, &entry.address, entry.amount, entry.position)
}

/// Checks a holder list and returns it ordered by position.
///
/// Rejects duplicate addresses, duplicate or missing positions (positions must
/// be exactly `0..n`) and zero amounts, which the destination program refuses
/// to pay out.
pub fn validate_entries(entries: &[HolderEntry]) -> Result<Vec<HolderEntry>> {
    if u32::try_from(entries.len()).is_err() {
        return Err(KernelError::TooManyHolders);
    }

    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(entry.address) {
            return Err(KernelError::DuplicateAddress(entry.address.to_base58()));
        }
        if entry.amount == 0 {
            return Err(KernelError::ZeroAmount(entry.position));
        }
    }

    let mut ordered = entries.to_vec();
    ordered.sort_by_key(|e| e.position);

    for (expected, entry) in ordered.iter().enumerate() {
        let expected = expected as u32;
        if entry.position != expected {
            if expected > 0 && ordered[expected as usize - 1].position == entry.position {
                return Err(KernelError::DuplicatePosition(entry.position));
            }
            return Err(KernelError::NonContiguousPosition {
                expected,
                found: entry.position,
            });
        }
    }

    Ok(ordered)
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-width value types shared by every stage of the pipeline.

pub mod address;
pub mod digest;
pub mod holder;

pub use address::Address;
pub use digest::{digest_from_hex, digest_from_slice, digest_to_hex, digest_to_prefixed_hex, Digest};
pub use holder::HolderEntry;

use alloc::string::ToString;

use crate::error::{KernelError, Result};

/// Token amount in the destination ledger's native width.
pub type Amount = u64;

/// Parses a decimal amount string.
///
/// Only plain ASCII digits are accepted: no sign, no exponent, no separators.
pub fn parse_amount(text: &str) -> Result<Amount> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KernelError::InvalidAmount(text.to_string()));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| KernelError::InvalidAmount(text.to_string()))
}

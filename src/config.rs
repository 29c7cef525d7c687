// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants.
//!
//! Every value here feeds a hash input. Changing any of them changes every root,
//! so they are versioned together under [`COMMITMENT_VERSION`].

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// Version of the commitment layout (leaf encoding + pairing + padding).
pub const COMMITMENT_VERSION: u32 = 1;

/// Width of every digest (leaf, internal node, root).
pub const DIGEST_LEN: usize = 32;

/// Width of a destination-ledger address (ed25519 public key).
pub const ADDRESS_LEN: usize = 32;

/// Width of the amount field in the authoritative leaf encoding (u64 LE).
pub const AMOUNT_WIDTH: usize = 8;

/// Width of the amount field in the keccak compatibility encoding (u256 BE).
pub const WIDE_AMOUNT_WIDTH: usize = 32;

/// Width of the position field (u32 LE) in both encodings.
pub const POSITION_WIDTH: usize = 4;

/// Scheme used whenever the caller does not name one.
pub const DEFAULT_SCHEME: CommitmentScheme = CommitmentScheme::Sha256V1;

/// A complete commitment scheme: digest function, leaf layout and pairing rule.
///
/// Both variants pair nodes commutatively (`H(min || max)`) and pad odd levels
/// by duplicating the last node. They differ in digest function and in how the
/// amount is laid out inside the leaf, so they are distinct commitments, never
/// two modes of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CommitmentScheme {
    /// SHA-256 over `address[32] || amount u64 LE || position u32 LE`.
    ///
    /// Bit-identical to the destination program's claim check. Authoritative.
    #[serde(rename = "sha256-v1")]
    Sha256V1,
    /// Keccak-256 over `address[32] || amount u256 BE || position u32 LE`.
    ///
    /// Matches roots produced by source-ledger tooling.
    #[serde(rename = "keccak256-v1")]
    Keccak256V1,
}

impl CommitmentScheme {
    /// Stable text tag used in payloads and configuration.
    pub const fn tag(self) -> &'static str {
        match self {
            CommitmentScheme::Sha256V1 => "sha256-v1",
            CommitmentScheme::Keccak256V1 => "keccak256-v1",
        }
    }

    /// Stable one-byte id used in binary artifacts.
    pub const fn id(self) -> u8 {
        match self {
            CommitmentScheme::Sha256V1 => 1,
            CommitmentScheme::Keccak256V1 => 2,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, KernelError> {
        match id {
            1 => Ok(CommitmentScheme::Sha256V1),
            2 => Ok(CommitmentScheme::Keccak256V1),
            other => Err(KernelError::UnknownScheme(other)),
        }
    }

    /// Width of the amount field in this scheme's leaf encoding.
    pub const fn amount_width(self) -> usize {
        match self {
            CommitmentScheme::Sha256V1 => AMOUNT_WIDTH,
            CommitmentScheme::Keccak256V1 => WIDE_AMOUNT_WIDTH,
        }
    }

    /// Total width of an encoded leaf preimage.
    pub const fn leaf_width(self) -> usize {
        ADDRESS_LEN + self.amount_width() + POSITION_WIDTH
    }
}

impl Default for CommitmentScheme {
    fn default() -> Self {
        DEFAULT_SCHEME
    }
}

impl fmt::Display for CommitmentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CommitmentScheme {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256-v1" | "sha256" => Ok(CommitmentScheme::Sha256V1),
            "keccak256-v1" | "keccak256" | "keccak" => Ok(CommitmentScheme::Keccak256V1),
            _ => Err(KernelError::UnknownSchemeTag),
        }
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.
//!
//! Every variant here is a `MalformedInput` in the claim taxonomy: a caller bug
//! that fails fast and is never retried. A proof that simply does not reconstruct
//! the root is not an error; the verifier returns `false` for it.

use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("Invalid digest length: expected {expected} bytes, found {found}")]
    InvalidDigestLength { expected: usize, found: usize },

    #[error("Invalid address length: expected {expected} bytes, found {found}")]
    InvalidAddressLength { expected: usize, found: usize },

    #[error("Invalid address encoding: {0}")]
    InvalidAddress(String),

    #[error("Invalid hex encoding")]
    InvalidHex,

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Zero amount for holder at position {0}")]
    ZeroAmount(u32),

    #[error("Duplicate position {0}")]
    DuplicatePosition(u32),

    #[error("Non-contiguous position: expected {expected}, found {found}")]
    NonContiguousPosition { expected: u32, found: u32 },

    #[error("Duplicate address {0}")]
    DuplicateAddress(String),

    #[error("Snapshot exceeds the position range")]
    TooManyHolders,

    #[error("Leaf index {index} out of range for {len} leaves")]
    LeafOutOfRange { index: usize, len: usize },

    #[error("Address {0} is not part of the snapshot")]
    UnknownAddress(String),

    #[error("Amount total overflows u64")]
    AmountOverflow,

    #[error("Unknown commitment scheme id {0}")]
    UnknownScheme(u8),

    #[error("Unknown commitment scheme tag")]
    UnknownSchemeTag,

    #[error("Scheme mismatch: expected {expected}, found {found}")]
    SchemeMismatch { expected: &'static str, found: &'static str },

    #[error("Invalid artifact magic")]
    InvalidMagic,

    #[error("Unsupported artifact version {found}, expected {expected}")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("Artifact truncated: need {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("Artifact checksum mismatch")]
    ChecksumMismatch,

    #[error("Root mismatch: artifact does not rebuild to its recorded root")]
    RootMismatch,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! snapclaim-kernel: deterministic, no_std snapshot commitments and claim verification.
//!
//! Builds a Merkle commitment over an ordered holder snapshot, hands out
//! per-holder inclusion proofs and verifies them bit-for-bit the same way the
//! destination ledger program does.

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod error;
pub mod types;
pub mod hash;
pub mod leaf;
pub mod tree;
pub mod proof;
pub mod verify;
pub mod snapshot;
pub mod claim;
pub mod sync;

pub use config::CommitmentScheme;
pub use error::{KernelError, KernelResult};
pub use proof::Proof;
pub use snapshot::Snapshot;
pub use tree::MerkleTree;
pub use types::{Address, Amount, Digest, HolderEntry};

#[cfg(test)]
pub mod tests;

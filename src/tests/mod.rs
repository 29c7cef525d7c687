pub mod proof_tests;
pub mod snapshot_tests;
pub mod e2e_tests;

use std::vec::Vec;

use crate::types::{Address, HolderEntry};

/// Distinct, recognisable addresses: holder `i` is `[i + 1; 32]`.
pub(crate) fn holders(amounts: &[u64]) -> Vec<HolderEntry> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| HolderEntry::new(Address::new([i as u8 + 1; 32]), *amount, i as u32))
        .collect()
}

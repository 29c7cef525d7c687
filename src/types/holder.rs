// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{Address, Amount};
use crate::error::{KernelError, Result};

/// One row of a holder snapshot.
///
/// `position` is the entry's fixed slot in the snapshot ordering. It is hashed
/// into the leaf, so it must never change for the lifetime of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderEntry {
    pub address: Address,
    pub amount: Amount,
    pub position: u32,
}

impl HolderEntry {
    pub const fn new(address: Address, amount: Amount, position: u32) -> Self {
        Self { address, amount, position }
    }

    /// Assigns contiguous positions `0..n` in list order.
    pub fn enumerate<I>(holders: I) -> Result<Vec<HolderEntry>>
    where
        I: IntoIterator<Item = (Address, Amount)>,
    {
        holders
            .into_iter()
            .enumerate()
            .map(|(i, (address, amount))| {
                let position = u32::try_from(i).map_err(|_| KernelError::TooManyHolders)?;
                Ok(HolderEntry::new(address, amount, position))
            })
            .collect()
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Inclusion proofs.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::types::{digest_from_hex, digest_to_prefixed_hex, Digest};

/// Sibling digests from the leaf level up to the root.
///
/// Pairing is commutative, so no left/right direction bits are carried. A proof
/// is a pure function of the holder list and can be regenerated at any time.
///
/// Serializes as a list of `0x` hex strings, the published payload form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Proof {
    siblings: Vec<Digest>,
}

impl Proof {
    pub fn new(siblings: Vec<Digest>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Digest] {
        &self.siblings
    }

    pub fn into_siblings(self) -> Vec<Digest> {
        self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.siblings.iter().map(digest_to_prefixed_hex).collect()
    }

    /// Any element that is not exactly 32 bytes of hex rejects the whole proof.
    pub fn from_hex<S: AsRef<str>>(elements: &[S]) -> Result<Self> {
        let siblings = elements
            .iter()
            .map(|e| digest_from_hex(e.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { siblings })
    }
}

impl From<Vec<Digest>> for Proof {
    fn from(siblings: Vec<Digest>) -> Self {
        Self::new(siblings)
    }
}

impl From<Proof> for Vec<String> {
    fn from(proof: Proof) -> Self {
        proof.to_hex()
    }
}

impl TryFrom<Vec<String>> for Proof {
    type Error = KernelError;

    fn try_from(elements: Vec<String>) -> Result<Self> {
        Proof::from_hex(&elements[..])
    }
}

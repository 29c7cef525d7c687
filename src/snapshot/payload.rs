// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Publication payload.
//!
//! ```text
//! { "root": "<hex>",
//!   "claims": { "<address>": { "amount": "<decimal>", "index": <u32>, "proof": ["0x<hex>", ...] } },
//!   "scheme": "sha256-v1", "createdAt": <unix secs>, "claimCount": <n>, "totalTokens": "<decimal>" }
//! ```
//! Only `root` and `claims` are required. Where the payload is served from is
//! not this crate's concern.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{ClaimEntry, Snapshot};
use crate::config::CommitmentScheme;
use crate::error::{KernelError, Result};
use crate::proof::Proof;
use crate::types::{digest_from_hex, digest_to_hex, parse_amount, Address};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayload {
    pub amount: String,
    pub index: u32,
    pub proof: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub root: String,
    pub claims: BTreeMap<String, ClaimPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<CommitmentScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<String>,
}

impl Snapshot {
    pub fn to_payload(&self) -> SnapshotPayload {
        let claims = self
            .entries()
            .map(|(address, claim)| {
                (
                    address.to_base58(),
                    ClaimPayload {
                        amount: claim.amount.to_string(),
                        index: claim.position,
                        proof: claim.proof.to_hex(),
                    },
                )
            })
            .collect();

        SnapshotPayload {
            root: digest_to_hex(&self.root()),
            claims,
            scheme: Some(self.scheme()),
            created_at: Some(self.created_at()),
            claim_count: Some(self.len()),
            total_tokens: self.total_amount().ok().map(|t| t.to_string()),
        }
    }

    /// Strict parse of a published payload.
    ///
    /// `fallback_scheme` applies when the payload does not name its scheme. A
    /// payload that names a different scheme than the caller expects is rejected
    /// only by [`Snapshot::from_payload_expecting`].
    pub fn from_payload(payload: &SnapshotPayload, fallback_scheme: CommitmentScheme) -> Result<Self> {
        let scheme = payload.scheme.unwrap_or(fallback_scheme);
        let root = digest_from_hex(&payload.root)?;

        let mut entries = BTreeMap::new();
        for (address_text, claim) in &payload.claims {
            let address = Address::parse(address_text)?;
            let entry = ClaimEntry {
                amount: parse_amount(&claim.amount)?,
                position: claim.index,
                proof: Proof::from_hex(&claim.proof[..])?,
            };
            if entries.insert(address, entry).is_some() {
                return Err(KernelError::DuplicateAddress(address.to_base58()));
            }
        }

        Snapshot::from_parts(scheme, root, entries, payload.created_at.unwrap_or(0))
    }

    /// Like [`Snapshot::from_payload`] but refuses a payload built under another scheme.
    pub fn from_payload_expecting(payload: &SnapshotPayload, scheme: CommitmentScheme) -> Result<Self> {
        if let Some(found) = payload.scheme {
            if found != scheme {
                return Err(KernelError::SchemeMismatch {
                    expected: scheme.tag(),
                    found: found.tag(),
                });
            }
        }
        Self::from_payload(payload, scheme)
    }
}

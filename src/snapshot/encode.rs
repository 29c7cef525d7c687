// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot artifact encoding.
//!
//! ```text
//! [ magic "SNCL" | version u32 LE | scheme u8 | created_at u64 LE ]  header, 17 bytes
//! [ bincode(ArtifactBody) ]                                         body
//! [ blake3(header || body) ]                                        trailer, 32 bytes
//! ```
//! The body carries the root and the holder list only. Proofs are derived on
//! decode, so a stored artifact can never hold a proof that disagrees with it.

use alloc::string::ToString;
use alloc::vec::Vec;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use super::blake3::artifact_checksum;
use super::Snapshot;
use crate::error::{KernelError, Result};
use crate::types::Digest;

pub const MAGIC: &[u8; 4] = b"SNCL";
pub const ARTIFACT_VERSION: u32 = 1;
pub const HEADER_LEN: usize = 4 + 4 + 1 + 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ArtifactHolder {
    pub address: [u8; 32],
    pub amount: u64,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ArtifactBody {
    pub root: Digest,
    pub holders: Vec<ArtifactHolder>,
}

fn write_header(snapshot: &Snapshot) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    let mut offset = 0;

    header[offset..offset + 4].copy_from_slice(MAGIC);
    offset += 4;
    LittleEndian::write_u32(&mut header[offset..offset + 4], ARTIFACT_VERSION);
    offset += 4;
    header[offset] = snapshot.scheme().id();
    offset += 1;
    LittleEndian::write_u64(&mut header[offset..offset + 8], snapshot.created_at());

    header
}

pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let body = ArtifactBody {
        root: snapshot.root(),
        holders: snapshot
            .holders()
            .into_iter()
            .map(|h| ArtifactHolder {
                address: *h.address.as_bytes(),
                amount: h.amount,
                position: h.position,
            })
            .collect(),
    };

    let body_bytes = bincode::serde::encode_to_vec(&body, bincode::config::standard())
        .map_err(|e| KernelError::Encode(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + body_bytes.len() + 32);
    out.extend_from_slice(&write_header(snapshot));
    out.extend_from_slice(&body_bytes);

    let checksum = artifact_checksum(&out);
    out.extend_from_slice(&checksum);
    Ok(out)
}

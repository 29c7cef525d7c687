// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot artifact decoding.
//!
//! Strict: the trailer is checked before anything is parsed, the header must
//! match exactly, the body must be consumed completely, and the rebuilt root
//! must equal the stored one.

use alloc::string::ToString;
use alloc::vec::Vec;

use byteorder::{ByteOrder, LittleEndian};

use super::blake3::{checksum_matches, CHECKSUM_LEN};
use super::encode::{ArtifactBody, ARTIFACT_VERSION, HEADER_LEN, MAGIC};
use super::Snapshot;
use crate::config::CommitmentScheme;
use crate::error::{KernelError, Result};
use crate::types::{Address, HolderEntry};

fn read_u32(buf: &[u8], offset: &mut usize) -> Result<u32> {
    if *offset + 4 > buf.len() {
        return Err(KernelError::Truncated { expected: *offset + 4, found: buf.len() });
    }
    let val = LittleEndian::read_u32(&buf[*offset..*offset + 4]);
    *offset += 4;
    Ok(val)
}

fn read_u64(buf: &[u8], offset: &mut usize) -> Result<u64> {
    if *offset + 8 > buf.len() {
        return Err(KernelError::Truncated { expected: *offset + 8, found: buf.len() });
    }
    let val = LittleEndian::read_u64(&buf[*offset..*offset + 8]);
    *offset += 8;
    Ok(val)
}

fn read_u8(buf: &[u8], offset: &mut usize) -> Result<u8> {
    let val = *buf
        .get(*offset)
        .ok_or(KernelError::Truncated { expected: *offset + 1, found: buf.len() })?;
    *offset += 1;
    Ok(val)
}

pub fn decode_snapshot(buf: &[u8]) -> Result<Snapshot> {
    let min = HEADER_LEN + CHECKSUM_LEN;
    if buf.len() < min {
        return Err(KernelError::Truncated { expected: min, found: buf.len() });
    }

    let (content, trailer) = buf.split_at(buf.len() - CHECKSUM_LEN);
    let mut expected = [0u8; CHECKSUM_LEN];
    expected.copy_from_slice(trailer);
    if !checksum_matches(content, &expected) {
        return Err(KernelError::ChecksumMismatch);
    }

    if &content[..4] != MAGIC {
        return Err(KernelError::InvalidMagic);
    }
    let mut offset = 4;

    let version = read_u32(content, &mut offset)?;
    if version != ARTIFACT_VERSION {
        return Err(KernelError::UnsupportedVersion { expected: ARTIFACT_VERSION, found: version });
    }
    let scheme = CommitmentScheme::from_id(read_u8(content, &mut offset)?)?;
    let created_at = read_u64(content, &mut offset)?;

    let body_bytes = &content[offset..];
    let (body, consumed): (ArtifactBody, usize) =
        bincode::serde::decode_from_slice(body_bytes, bincode::config::standard())
            .map_err(|e| KernelError::Decode(e.to_string()))?;
    if consumed != body_bytes.len() {
        return Err(KernelError::Decode("trailing bytes after body".to_string()));
    }

    let holders: Vec<HolderEntry> = body
        .holders
        .iter()
        .map(|h| HolderEntry::new(Address::new(h.address), h.amount, h.position))
        .collect();

    let snapshot = Snapshot::build(scheme, &holders, created_at)?;
    if snapshot.root() != body.root {
        return Err(KernelError::RootMismatch);
    }
    Ok(snapshot)
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reading holder lists and published snapshots from disk.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use snapclaim_kernel::snapshot::decode::decode_snapshot;
use snapclaim_kernel::snapshot::SnapshotPayload;
use snapclaim_kernel::types::parse_amount;
use snapclaim_kernel::{Address, Amount, CommitmentScheme, HolderEntry, Snapshot};

pub const ARTIFACT_EXTENSION: &str = "sncl";

#[derive(Debug, Deserialize)]
struct HolderRow {
    address: String,
    amount: String,
}

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Artifact,
    Payload,
}

impl SourceKind {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ARTIFACT_EXTENSION) => SourceKind::Artifact,
            _ => SourceKind::Payload,
        }
    }
}

/// Holders in list order. JSON (`[{"address", "amount"}]`) or CSV
/// (`address,amount` per line, optional header) by extension.
pub fn read_holders(path: &Path) -> Result<Vec<HolderEntry>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read holder list {:?}", path))?;

    let pairs = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let rows: Vec<HolderRow> = serde_json::from_str(&text).context("Holder list is not valid JSON")?;
        rows.iter()
            .enumerate()
            .map(|(i, row)| parse_pair(i + 1, &row.address, &row.amount))
            .collect::<Result<Vec<_>>>()?
    } else {
        parse_csv(&text)?
    };

    Ok(HolderEntry::enumerate(pairs)?)
}

fn parse_csv(text: &str) -> Result<Vec<(Address, Amount)>> {
    let mut pairs = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((address, amount)) = line.split_once(',') else {
            bail!("line {}: expected `address,amount`", i + 1);
        };
        if i == 0 && address.trim().eq_ignore_ascii_case("address") {
            continue;
        }
        pairs.push(parse_pair(i + 1, address, amount)?);
    }
    Ok(pairs)
}

fn parse_pair(row: usize, address: &str, amount: &str) -> Result<(Address, Amount)> {
    let address = Address::parse(address.trim()).with_context(|| format!("row {row}: bad address"))?;
    let amount = parse_amount(amount.trim()).with_context(|| format!("row {row}: bad amount"))?;
    Ok((address, amount))
}

/// Loads a snapshot from a binary artifact or a publication payload.
pub fn load_snapshot(path: &Path, scheme: CommitmentScheme) -> Result<(Snapshot, SourceKind)> {
    let kind = SourceKind::for_path(path);
    let snapshot = match kind {
        SourceKind::Artifact => {
            let bytes = fs::read(path).with_context(|| format!("Failed to read artifact {:?}", path))?;
            decode_snapshot(&bytes).context("Failed to decode snapshot artifact")?
        }
        SourceKind::Payload => {
            let payload = read_payload(path)?;
            Snapshot::from_payload(&payload, scheme).context("Failed to load snapshot payload")?
        }
    };
    Ok((snapshot, kind))
}

pub fn read_payload(path: &Path) -> Result<SnapshotPayload> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read payload {:?}", path))?;
    serde_json::from_str(&text).context("Payload is not valid JSON")
}

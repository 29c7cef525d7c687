// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use snapclaim_kernel::snapshot::encode::encode_snapshot;
use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::{CommitmentScheme, Snapshot};

use crate::source::read_holders;

/// Commits a holder list and writes the publication payload, plus the binary
/// artifact when `artifact` is given.
pub fn run(holders_path: &Path, scheme: CommitmentScheme, out: &Path, artifact: Option<&Path>) -> Result<Snapshot> {
    let holders = read_holders(holders_path)?;
    let created_at = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
    let snapshot = Snapshot::build(scheme, &holders, created_at).context("Failed to build snapshot")?;

    let json = serde_json::to_string_pretty(&snapshot.to_payload())?;
    fs::write(out, json).with_context(|| format!("Failed to write payload {:?}", out))?;

    if let Some(path) = artifact {
        let bytes = encode_snapshot(&snapshot)?;
        fs::write(path, &bytes).with_context(|| format!("Failed to write artifact {:?}", path))?;
        println!("Artifact:  {:?} ({} bytes)", path, bytes.len());
    }

    println!("Root:      {}", digest_to_hex(&snapshot.root()));
    println!("Scheme:    {}", snapshot.scheme());
    println!("Holders:   {}", snapshot.len());
    println!("Total:     {}", snapshot.total_amount()?);
    println!("Payload:   {:?}", out);

    Ok(snapshot)
}

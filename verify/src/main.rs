// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use snapclaim_kernel::config::COMMITMENT_VERSION;
use snapclaim_kernel::snapshot::blake3::artifact_checksum;
use snapclaim_kernel::snapshot::SnapshotPayload;
use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::{CommitmentScheme, MerkleTree, Snapshot};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Published snapshot payload (JSON)
    payload: PathBuf,

    /// Scheme to assume when the payload does not name one
    #[arg(long, default_value = "sha256-v1")]
    scheme: CommitmentScheme,

    /// Root the payload is expected to commit to (e.g. read from the ledger)
    #[arg(long)]
    expect_root: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
struct AuditReport {
    pub commitment_version: u32,
    pub scheme: CommitmentScheme,
    pub payload_blake3: String,
    pub published_root: String,
    pub recomputed_root: String,
    pub claim_count: usize,
    pub total_tokens: String,
    /// Addresses whose published proof does not verify.
    pub failed_proofs: Vec<String>,
    /// Declared fields that disagree with the claims themselves.
    pub inconsistencies: Vec<String>,
    pub valid: bool,
}

/// Re-derives every leaf, the root, and every proof from the published claims.
fn audit(bytes: &[u8], scheme: CommitmentScheme, expect_root: Option<&str>) -> Result<AuditReport> {
    let payload: SnapshotPayload = serde_json::from_slice(bytes).context("Payload is not valid JSON")?;
    let snapshot = Snapshot::from_payload(&payload, scheme).context("Malformed payload")?;

    let tree = MerkleTree::build(snapshot.scheme(), &snapshot.holders()).context("Failed to rebuild tree")?;
    let published_root = digest_to_hex(&snapshot.root());
    let recomputed_root = digest_to_hex(&tree.root());
    let total = snapshot.total_amount()?;

    let mut inconsistencies = Vec::new();
    if published_root != recomputed_root {
        inconsistencies.push("root does not match the claims".to_string());
    }
    if let Some(expected) = expect_root {
        let expected = digest_to_hex(&snapclaim_kernel::types::digest_from_hex(expected)?);
        if expected != published_root {
            inconsistencies.push(format!("root differs from expected {expected}"));
        }
    }
    if payload.claim_count.is_some_and(|n| n != snapshot.len()) {
        inconsistencies.push("claimCount does not match the claims".to_string());
    }
    if payload.total_tokens.as_ref().is_some_and(|t| *t != total.to_string()) {
        inconsistencies.push("totalTokens does not match the claims".to_string());
    }

    let failed_proofs: Vec<String> = snapshot.audit().iter().map(|a| a.to_base58()).collect();
    let valid = failed_proofs.is_empty() && inconsistencies.is_empty();

    Ok(AuditReport {
        commitment_version: COMMITMENT_VERSION,
        scheme: snapshot.scheme(),
        payload_blake3: hex_string(&artifact_checksum(bytes)),
        published_root,
        recomputed_root,
        claim_count: snapshot.len(),
        total_tokens: total.to_string(),
        failed_proofs,
        inconsistencies,
        valid,
    })
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    eprintln!("Snapclaim Verifier v0.1.0");
    eprintln!("Protocol: commitment v{}, default scheme {}", COMMITMENT_VERSION, args.scheme);

    let bytes = fs::read(&args.payload).context("Failed to read payload file")?;
    let report = audit(&bytes, args.scheme, args.expect_root.as_deref())?;

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);

    if !report.valid {
        anyhow::bail!("payload failed audit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapclaim_kernel::{Address, HolderEntry};

    fn payload_bytes(scheme: CommitmentScheme) -> (Snapshot, Vec<u8>) {
        let holders =
            HolderEntry::enumerate((1u8..=4).zip([100u64, 250, 84021, 5]).map(|(i, a)| (Address::new([i; 32]), a)))
                .unwrap();
        let snapshot = Snapshot::build(scheme, &holders, 0).unwrap();
        let bytes = serde_json::to_vec(&snapshot.to_payload()).unwrap();
        (snapshot, bytes)
    }

    #[test]
    fn test_clean_payload_passes() {
        let (_, bytes) = payload_bytes(CommitmentScheme::Keccak256V1);
        let report = audit(
            &bytes,
            CommitmentScheme::Sha256V1,
            Some("0x9bf04130d3db5dd6cf8f3e3c0613126610adddeb45d63024093c4a2c7839c7bb"),
        )
        .unwrap();
        assert!(report.valid, "{report:?}");
        assert_eq!(report.scheme, CommitmentScheme::Keccak256V1);
        assert_eq!(report.published_root, report.recomputed_root);
        assert_eq!(report.total_tokens, "84376");
    }

    #[test]
    fn test_tampering_is_reported() {
        let (snapshot, bytes) = payload_bytes(CommitmentScheme::Sha256V1);
        let mut payload: SnapshotPayload = serde_json::from_slice(&bytes).unwrap();
        let key = Address::new([4; 32]).to_base58();
        payload.claims.get_mut(&key).unwrap().amount = "6".to_string();
        let tampered = serde_json::to_vec(&payload).unwrap();

        let report = audit(&tampered, CommitmentScheme::Sha256V1, None).unwrap();
        assert!(!report.valid);
        assert_eq!(report.failed_proofs, vec![key]);
        assert_eq!(report.published_root, digest_to_hex(&snapshot.root()));
        assert_ne!(report.recomputed_root, report.published_root);
        assert_eq!(report.inconsistencies.len(), 2);
    }

    #[test]
    fn test_unexpected_root_is_reported() {
        let (_, bytes) = payload_bytes(CommitmentScheme::Sha256V1);
        let report = audit(&bytes, CommitmentScheme::Sha256V1, Some(&"ab".repeat(32))).unwrap();
        assert!(!report.valid);
        assert_eq!(report.failed_proofs.len(), 0);
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use std::path::Path;

use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::CommitmentScheme;

use crate::source::{load_snapshot, SourceKind};

/// Summary of a snapshot file, as printed by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub kind: SourceKind,
    pub root: String,
    pub scheme: CommitmentScheme,
    pub holders: usize,
    pub total: u64,
    pub failed_proofs: usize,
}

pub fn run(path: &Path, scheme: CommitmentScheme) -> anyhow::Result<Inspection> {
    let (snapshot, kind) = load_snapshot(path, scheme)?;
    let failures = snapshot.audit();

    let inspection = Inspection {
        kind,
        root: digest_to_hex(&snapshot.root()),
        scheme: snapshot.scheme(),
        holders: snapshot.len(),
        total: snapshot.total_amount()?,
        failed_proofs: failures.len(),
    };

    println!("\nSnapclaim Snapshot Report");
    println!("-------------------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    let created = match kind {
        // Payloads without createdAt decode as 0.
        SourceKind::Payload if snapshot.created_at() == 0 => "unknown".to_string(),
        _ => chrono::DateTime::from_timestamp(snapshot.created_at() as i64, 0)
            .unwrap_or_default()
            .to_rfc3339(),
    };
    let proofs = if failures.is_empty() {
        "all verify".to_string()
    } else {
        format!("{} FAILED", failures.len())
    };

    table.add_row(vec!["Source".to_string(), format!("{:?}", kind)]);
    table.add_row(vec!["Root".to_string(), inspection.root.clone()]);
    table.add_row(vec!["Scheme".to_string(), inspection.scheme.to_string()]);
    table.add_row(vec!["Created".to_string(), created]);
    table.add_row(vec!["Holders".to_string(), inspection.holders.to_string()]);
    table.add_row(vec!["Total".to_string(), inspection.total.to_string()]);
    table.add_row(vec!["Proofs".to_string(), proofs]);
    println!("{table}\n");

    for address in failures.iter().take(10) {
        println!("  failed: {address}");
    }

    Ok(inspection)
}

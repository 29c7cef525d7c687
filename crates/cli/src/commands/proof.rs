// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use snapclaim_kernel::snapshot::ClaimEntry;
use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::{Address, CommitmentScheme};

use crate::source::load_snapshot;

/// Prints the claim entry for `address`. Errors if the address is not in the snapshot.
pub fn run(snapshot_path: &Path, address: &str, scheme: CommitmentScheme) -> Result<ClaimEntry> {
    let (snapshot, _) = load_snapshot(snapshot_path, scheme)?;
    let address = Address::parse(address)?;
    let claim = snapshot.claim_or_err(&address)?.clone();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Root".to_string(), digest_to_hex(&snapshot.root())]);
    table.add_row(vec!["Address".to_string(), address.to_base58()]);
    table.add_row(vec!["Amount".to_string(), claim.amount.to_string()]);
    table.add_row(vec!["Index".to_string(), claim.position.to_string()]);
    for (i, sibling) in claim.proof.to_hex().into_iter().enumerate() {
        table.add_row(vec![format!("Proof[{i}]"), sibling]);
    }
    println!("{table}\n");

    Ok(claim)
}

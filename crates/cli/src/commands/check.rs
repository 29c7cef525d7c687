// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{bail, Result};
use snapclaim_kernel::verify::verify_encoded;
use snapclaim_kernel::CommitmentScheme;

/// Off-chain pre-check of one claim. A proof that does not verify is an error.
pub fn run(
    scheme: CommitmentScheme,
    root: &str,
    address: &str,
    amount: &str,
    index: u32,
    proof: &[String],
) -> Result<()> {
    if verify_encoded(scheme, address, amount, index, proof, root)? {
        println!("\n✅ ELIGIBLE\n");
        println!("Address: {address}");
        println!("Amount:  {amount}");
        println!("Scheme:  {scheme}\n");
        Ok(())
    } else {
        println!("\n❌ NOT ELIGIBLE\n");
        bail!("proof does not verify against root {root}")
    }
}

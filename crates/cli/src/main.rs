// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use snapclaim_cli::commands::{build, check, inspect, proof};
use snapclaim_kernel::CommitmentScheme;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapclaim")]
#[command(about = "Snapclaim - holder snapshot commitments and claim proofs", long_about = None)]
struct Cli {
    /// Commitment scheme (`sha256-v1` or `keccak256-v1`)
    #[arg(long, global = true, default_value = "sha256-v1")]
    scheme: CommitmentScheme,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit a holder list (CSV or JSON) and write the publication payload.
    Build {
        /// Holder list, committed in file order.
        holders: PathBuf,

        /// Where to write the payload JSON.
        #[arg(long, short, default_value = "snapshot.json")]
        out: PathBuf,

        /// Also write a binary `.sncl` artifact.
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Print the claim entry and proof for one address
    Proof {
        /// Payload JSON or `.sncl` artifact.
        snapshot: PathBuf,
        address: String,
    },
    /// Verify a claim against a root without any snapshot file
    Check {
        #[arg(long)]
        root: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        index: u32,
        /// Proof elements in order, comma separated.
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,
    },
    /// Summarize a snapshot and re-verify every proof in it
    Inspect {
        snapshot: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { holders, out, artifact } => {
            build::run(&holders, cli.scheme, &out, artifact.as_deref()).map(|_| ())
        }
        Commands::Proof { snapshot, address } => proof::run(&snapshot, &address, cli.scheme).map(|_| ()),
        Commands::Check {
            root,
            address,
            amount,
            index,
            proof,
        } => check::run(cli.scheme, &root, &address, &amount, index, &proof),
        Commands::Inspect { snapshot } => {
            let report = inspect::run(&snapshot, cli.scheme)?;
            if report.failed_proofs > 0 {
                anyhow::bail!("{} of {} proofs failed", report.failed_proofs, report.holders);
            }
            Ok(())
        }
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upow_kernel::config::{K_DIM, M_DIM, N_DIM};
use upow_kernel::verify::{verify_solution, VerificationReport};
use upow_kernel::Shape;

#[derive(Parser, Debug)]
#[command(author, version, about = "Re-derive a solution from its seed and check it byte for byte", long_about = None)]
struct Args {
    /// Path to the solution file (seed || result)
    solution: PathBuf,

    #[arg(long, default_value_t = M_DIM)]
    m: usize,

    #[arg(long, default_value_t = N_DIM)]
    n: usize,

    #[arg(long, default_value_t = K_DIM)]
    k: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "upow_verify=info,upow_kernel=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let shape = Shape::new(args.m, args.n, args.k)?;

    let bytes = fs::read(&args.solution)
        .with_context(|| format!("Failed to read solution file {}", args.solution.display()))?;
    let report = verify_solution(&bytes, shape).context("Failed to decode solution")?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    report_verdict(&args.solution, &report)
}

fn report_verdict(path: &Path, report: &VerificationReport) -> Result<()> {
    if report.valid {
        tracing::info!(path = %path.display(), sha256 = %report.sha256, "Solution valid");
        return Ok(());
    }
    tracing::error!(
        path = %path.display(),
        sha256 = %report.sha256,
        expected_sha256 = %report.expected_sha256,
        first_mismatch = ?report.first_mismatch,
        "Solution invalid"
    );
    match report.first_mismatch {
        Some(idx) => anyhow::bail!("Solution mismatch at element {}", idx),
        None => anyhow::bail!("Solution bytes differ from the recomputed encoding"),
    }
}

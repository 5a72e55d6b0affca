// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use upow_kernel::backend::BackendKind;
use upow_kernel::executor::build_executor;
use upow_kernel::pipeline::solve;
use upow_kernel::{SeedChain, Shape};

pub struct SolveOptions {
    pub seed_hex: Option<String>,
    pub seed_bin: Option<PathBuf>,
    pub shape: Shape,
    pub backend: BackendKind,
    pub device_id: u32,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct SolveSummary {
    pub backend: String,
    pub strategy: String,
    pub m: usize,
    pub n: usize,
    pub k: usize,
    pub elapsed_ms: f64,
    pub bytes: usize,
    pub sha256: String,
    pub blake3: String,
    pub solution: String,
}

pub fn execute(opts: &SolveOptions) -> anyhow::Result<SolveSummary> {
    let seed = SeedChain::standard(opts.seed_hex.clone(), opts.seed_bin.clone())
        .resolve()
        .context("Failed to load seed")?;
    let mut executor = build_executor(opts.backend)?;
    let outcome = solve(&seed, opts.shape, &mut *executor, opts.device_id)?;

    if let Some(path) = &opts.out {
        outcome
            .solution
            .write_to(path)
            .with_context(|| format!("Failed to write solution to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Solution written");
    }

    Ok(SolveSummary {
        backend: executor.backend_name().to_string(),
        strategy: outcome.strategy.to_string(),
        m: opts.shape.m,
        n: opts.shape.n,
        k: opts.shape.k,
        elapsed_ms: outcome.elapsed_ms,
        bytes: outcome.solution.len(),
        sha256: outcome.solution.sha256_hex(),
        blake3: outcome.solution.blake3_hex(),
        solution: outcome.solution.to_hex(),
    })
}

pub fn run(opts: &SolveOptions) -> anyhow::Result<()> {
    let summary = execute(opts)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

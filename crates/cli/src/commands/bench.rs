// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Benchmark sweep over a native matmul executable.
//!
//! For every block size (outer) and repeat (inner), strictly in order:
//!
//! ```text
//! matmul --m M --n N --k K --algo ALGO [--block B] --output TMP
//!   stdout -> JSON metrics
//!   TMP    -> artifact, hashed into output_hash
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;
use upow_kernel::artifact::hash_artifact;
use upow_kernel::results::{parse_blocks, parse_json_object, BenchmarkResults, RunRecord};
use upow_kernel::{Result, UpowError};

pub struct BenchOptions {
    pub binary: PathBuf,
    pub m: u32,
    pub n: u32,
    pub k: u32,
    pub algo: String,
    pub blocks: String,
    pub runs: u32,
    pub output: PathBuf,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("./matmul"),
            m: 256,
            n: 256,
            k: 256,
            algo: "blocked".to_string(),
            blocks: "32,64,128".to_string(),
            runs: 1,
            output: PathBuf::from("results.json"),
        }
    }
}

fn native_args(opts: &BenchOptions, block: u32, out: &Path) -> Vec<String> {
    let mut args = vec![
        "--m".to_string(),
        opts.m.to_string(),
        "--n".to_string(),
        opts.n.to_string(),
        "--k".to_string(),
        opts.k.to_string(),
        "--algo".to_string(),
        opts.algo.clone(),
    ];
    if opts.algo == "blocked" {
        args.push("--block".to_string());
        args.push(block.to_string());
    }
    args.push("--output".to_string());
    args.push(out.to_string_lossy().into_owned());
    args
}

/// One native invocation. The temp artifact is removed when this returns.
fn run_once(opts: &BenchOptions, block: u32) -> Result<RunRecord> {
    let tmp = tempfile::Builder::new()
        .prefix("matmul_out_")
        .suffix(".bin")
        .tempfile()?
        .into_temp_path();

    let args = native_args(opts, block, &tmp);
    tracing::debug!(binary = %opts.binary.display(), ?args, "Launching native run");
    let output = Command::new(&opts.binary).args(&args).output().map_err(|e| {
        UpowError::BackendExecution(format!("Failed to launch {}: {}", opts.binary.display(), e))
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(UpowError::BackendExecution(format!(
            "{} exited with {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            opts.binary.display(),
            output.status,
            stdout,
            stderr
        )));
    }

    let metrics = parse_json_object(&stdout)?;
    let (_, digest) = hash_artifact(&tmp)?;
    Ok(RunRecord {
        metrics,
        output_hash: digest.to_hex(),
    })
}

pub fn run_benchmark(opts: &BenchOptions) -> Result<BenchmarkResults> {
    let blocks = parse_blocks(&opts.blocks)?;
    let mut results = Vec::new();

    for &block in &blocks {
        for repeat in 0..opts.runs {
            let record = run_once(opts, block)?;
            tracing::info!(block, repeat, output_hash = %record.output_hash, "Run complete");
            results.push(record);
        }
    }

    Ok(BenchmarkResults {
        m: opts.m,
        n: opts.n,
        k: opts.k,
        algo: opts.algo.clone(),
        blocks,
        runs: opts.runs,
        results,
    })
}

pub fn run(opts: &BenchOptions) -> anyhow::Result<()> {
    let results = run_benchmark(opts)?;
    results.write_to(&opts.output)?;
    println!("{}", results.to_json_pretty()?);
    tracing::info!(path = %opts.output.display(), "Results written");
    Ok(())
}

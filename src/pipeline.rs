// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Seed to solution, end to end.

use crate::error::Result;
use crate::executor::MatmulExecutor;
use crate::expand::expand;
use crate::pad::PaddedWorkload;
use crate::seed::Seed;
use crate::solution::Solution;
use crate::types::{Matrix, Shape};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub result: Matrix<i32>,
    pub solution: Solution,
    /// Wall time of the device dispatch only.
    pub elapsed_ms: f64,
    pub strategy: &'static str,
}

pub fn solve(
    seed: &Seed,
    shape: Shape,
    executor: &mut dyn MatmulExecutor,
    device_id: u32,
) -> Result<SolveOutcome> {
    let pair = expand(seed, shape)?;
    let padded = PaddedWorkload::new(&pair, executor.tile())?;

    let start = Instant::now();
    let result = executor.execute(&padded, device_id)?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let solution = Solution::encode(seed, &result);
    tracing::info!(
        backend = executor.backend_name(),
        strategy = executor.strategy(),
        elapsed_ms,
        bytes = solution.len(),
        "Solution computed"
    );
    Ok(SolveOutcome {
        result,
        solution,
        elapsed_ms,
        strategy: executor.strategy(),
    })
}

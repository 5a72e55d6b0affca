// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Offline solution verification.
//!
//! Re-derives the workload from the seed embedded in a solution, recomputes
//! the product on the host without any backend, and compares byte for byte.

use crate::error::Result;
use crate::expand::expand;
use crate::math::matmul::reference_matmul;
use crate::solution::Solution;
use crate::types::Shape;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub valid: bool,
    pub m: usize,
    pub n: usize,
    pub k: usize,
    /// Row-major index of the first differing result entry.
    pub first_mismatch: Option<usize>,
    /// Digests of the bytes under verification.
    pub sha256: String,
    pub blake3: String,
    /// SHA-256 of the correct encoding for the embedded seed.
    pub expected_sha256: String,
}

pub fn verify_solution(bytes: &[u8], shape: Shape) -> Result<VerificationReport> {
    let (seed, claimed) = Solution::decode(bytes, shape)?;
    let pair = expand(&seed, shape)?;
    let expected = reference_matmul(&pair.a, &pair.b)?;

    let first_mismatch = claimed
        .as_slice()
        .iter()
        .zip(expected.as_slice())
        .position(|(c, e)| c != e);

    let recomputed = Solution::encode(&seed, &expected);
    let report = VerificationReport {
        valid: first_mismatch.is_none() && recomputed.as_bytes() == bytes,
        m: shape.m,
        n: shape.n,
        k: shape.k,
        first_mismatch,
        sha256: hex::encode(Sha256::digest(bytes)),
        blake3: blake3::hash(bytes).to_hex().to_string(),
        expected_sha256: recomputed.sha256_hex(),
    };
    tracing::info!(valid = report.valid, "Solution verified");
    Ok(report)
}

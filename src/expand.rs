// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic workload expansion.
//!
//! The seed is hashed once with BLAKE3 and the output is read in XOF mode.
//! There is no counter or nonce: the stream is a pure function of the seed
//! bytes, and any prefix of it is stable no matter how much is requested.
//!
//! ```text
//! stream = BLAKE3-XOF(seed)
//! A = stream[0 .. m*k]           as u8, m x k, row-major
//! B = stream[m*k .. m*k + k*n]   as i8, k x n, row-major
//! ```

use crate::error::Result;
use crate::seed::Seed;
use crate::types::{Matrix, Shape};

/// The two operands of one workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadPair {
    pub shape: Shape,
    pub a: Matrix<u8>,
    pub b: Matrix<i8>,
}

/// Fills `len` bytes of the BLAKE3 XOF stream keyed by `seed`.
pub fn expand_stream(seed: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed);
    hasher.finalize_xof().fill(&mut out);
    out
}

pub fn expand(seed: &Seed, shape: Shape) -> Result<WorkloadPair> {
    shape.validate()?;
    let a_len = shape.a_len();
    let mut stream = expand_stream(seed.as_bytes(), a_len + shape.b_len());

    let b_bytes = stream.split_off(a_len);
    let a = Matrix::from_vec(shape.m, shape.k, stream)?;
    // Two's-complement reinterpretation, same as viewing the bytes as int8.
    let b = Matrix::from_vec(
        shape.k,
        shape.n,
        b_bytes.into_iter().map(|v| v as i8).collect(),
    )?;

    tracing::debug!(m = shape.m, n = shape.n, k = shape.k, "Workload expanded");
    Ok(WorkloadPair { shape, a, b })
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reference integer matmul.

use crate::error::{Result, UpowError};
use crate::types::Matrix;

/// Computes `a x b` with an i32 accumulator.
///
/// Accumulation wraps on overflow, matching a device's 32-bit accumulator.
/// For the attestation shape the exact sum always fits, so wrapping never
/// triggers there.
pub fn matmul_i32<L, R>(a: &Matrix<L>, b: &Matrix<R>) -> Result<Matrix<i32>>
where
    L: Copy + Default + Into<i32>,
    R: Copy + Default + Into<i32>,
{
    if a.cols() != b.rows() {
        return Err(UpowError::InvalidInput(format!(
            "Inner dimension mismatch: {}x{} times {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }

    let n = b.cols();
    let mut c = Matrix::<i32>::zeros(a.rows(), n);
    for i in 0..a.rows() {
        let row_a = a.row(i);
        let row_c = c.row_mut(i);
        for (p, &av) in row_a.iter().enumerate() {
            let av: i32 = av.into();
            if av == 0 {
                continue;
            }
            for (cv, &bv) in row_c.iter_mut().zip(b.row(p)) {
                *cv = cv.wrapping_add(av.wrapping_mul(bv.into()));
            }
        }
    }
    Ok(c)
}

/// The unsigned-by-signed product computed directly on the host.
pub fn reference_matmul(a: &Matrix<u8>, b: &Matrix<i8>) -> Result<Matrix<i32>> {
    matmul_i32(a, b)
}

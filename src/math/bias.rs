// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bias correction for signed-only backends.
//!
//! ```text
//! A x B = (A' + 128) x B = A' x B + 128 * colsum(B)     where A' = A - 128
//! ```
//!
//! `A'` fits in i8, so `A' x B` can run on an i8 x i8 -> i32 primitive and the
//! unsigned result is recovered by adding `128 * colsum(B)[j]` to every row.

use crate::config::BIAS;
use crate::error::{Result, UpowError};
use crate::types::Matrix;

/// Maps every `u8` to `v - 128` as `i8`.
pub fn shift_to_signed(a: &Matrix<u8>) -> Matrix<i8> {
    a.map(|v| (i16::from(v) - BIAS as i16) as i8)
}

/// Sum of each column of `b`, widened to i32.
pub fn column_sums(b: &Matrix<i8>) -> Vec<i32> {
    let mut sums = vec![0i32; b.cols()];
    for r in 0..b.rows() {
        for (s, &v) in sums.iter_mut().zip(b.row(r)) {
            *s = s.wrapping_add(i32::from(v));
        }
    }
    sums
}

/// Adds `128 * colsum[j]` to column `j` of every row.
pub fn apply_bias_correction(c: &mut Matrix<i32>, colsum: &[i32]) -> Result<()> {
    if colsum.len() != c.cols() {
        return Err(UpowError::InvalidInput(format!(
            "Column sum length {} does not match result width {}",
            colsum.len(),
            c.cols()
        )));
    }
    for r in 0..c.rows() {
        for (cv, &s) in c.row_mut(r).iter_mut().zip(colsum) {
            *cv = cv.wrapping_add(BIAS.wrapping_mul(s));
        }
    }
    Ok(())
}

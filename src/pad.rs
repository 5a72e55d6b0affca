// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Tile padding.

use crate::error::{Result, UpowError};
use crate::expand::WorkloadPair;
use crate::types::{Matrix, Shape};

/// Smallest multiple of `multiple` that is `>= value`.
pub fn pad_to(value: usize, multiple: usize) -> usize {
    value.div_ceil(multiple) * multiple
}

/// Which axes of a matrix get rounded up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAxis {
    /// Rows only (operand A: M is padded, K is not).
    Rows,
    /// Columns only (operand B: N is padded, K is not).
    Cols,
}

/// Copies `matrix` into the top-left of a zeroed, tile-aligned matrix.
pub fn pad_matrix<T: Copy + Default>(matrix: &Matrix<T>, axis: PadAxis, tile: usize) -> Result<Matrix<T>> {
    if tile == 0 {
        return Err(UpowError::InvalidInput("Tile size must be positive".to_string()));
    }
    let (rows, cols) = match axis {
        PadAxis::Rows => (pad_to(matrix.rows(), tile), matrix.cols()),
        PadAxis::Cols => (matrix.rows(), pad_to(matrix.cols(), tile)),
    };
    if rows == matrix.rows() && cols == matrix.cols() {
        return Ok(matrix.clone());
    }

    let mut out = Matrix::zeros(rows, cols);
    for r in 0..matrix.rows() {
        out.row_mut(r)[..matrix.cols()].copy_from_slice(matrix.row(r));
    }
    Ok(out)
}

/// Tile-aligned operands plus the logical shape to cut the result back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedWorkload {
    pub logical: Shape,
    pub tile: usize,
    pub a: Matrix<u8>,
    pub b: Matrix<i8>,
}

impl PaddedWorkload {
    pub fn new(pair: &WorkloadPair, tile: usize) -> Result<Self> {
        let a = pad_matrix(&pair.a, PadAxis::Rows, tile)?;
        let b = pad_matrix(&pair.b, PadAxis::Cols, tile)?;
        tracing::debug!(
            m_pad = a.rows(),
            n_pad = b.cols(),
            k = pair.shape.k,
            tile,
            "Operands padded"
        );
        Ok(Self {
            logical: pair.shape,
            tile,
            a,
            b,
        })
    }

    pub fn padded_m(&self) -> usize {
        self.a.rows()
    }

    pub fn padded_n(&self) -> usize {
        self.b.cols()
    }

    /// Drops padded rows and columns from a device result.
    pub fn extract(&self, padded: &Matrix<i32>) -> Result<Matrix<i32>> {
        padded.top_left(self.logical.m, self.logical.n)
    }
}

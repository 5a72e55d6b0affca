// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dense row-major matrix.

use crate::error::{Result, UpowError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Wraps row-major `data`. Fails if its length is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(UpowError::InvalidInput(format!(
                "Matrix data length {} does not match {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Copies the top-left `rows x cols` block.
    pub fn top_left(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        if rows > self.rows || cols > self.cols {
            return Err(UpowError::InvalidInput(format!(
                "Cannot take {}x{} block from {}x{} matrix",
                rows, cols, self.rows, self.cols
            )));
        }
        let mut out = Matrix::zeros(rows, cols);
        for r in 0..rows {
            out.row_mut(r).copy_from_slice(&self.row(r)[..cols]);
        }
        Ok(out)
    }
}

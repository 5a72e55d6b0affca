// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{K_DIM, M_DIM, N_DIM};
use crate::error::{Result, UpowError};
use serde::{Deserialize, Serialize};

/// Problem dimensions: A is `m x k`, B is `k x n`, C is `m x n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub m: usize,
    pub n: usize,
    pub k: usize,
}

impl Shape {
    /// The attestation workload.
    pub const UPOW: Shape = Shape {
        m: M_DIM,
        n: N_DIM,
        k: K_DIM,
    };

    pub fn new(m: usize, n: usize, k: usize) -> Result<Self> {
        let shape = Self { m, n, k };
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> Result<()> {
        if self.m == 0 || self.n == 0 || self.k == 0 {
            return Err(UpowError::InvalidInput(format!(
                "Dimensions must be positive (m={}, n={}, k={})",
                self.m, self.n, self.k
            )));
        }
        // A and B are materialized as one stream, so both must fit together.
        self.a_len()
            .checked_add(self.b_len())
            .and_then(|_| self.m.checked_mul(self.n))
            .ok_or_else(|| UpowError::InvalidInput("Dimensions overflow".to_string()))?;
        Ok(())
    }

    pub fn a_len(&self) -> usize {
        self.m.saturating_mul(self.k)
    }

    pub fn b_len(&self) -> usize {
        self.k.saturating_mul(self.n)
    }

    pub fn c_len(&self) -> usize {
        self.m * self.n
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::UPOW
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canonical solution encoding.
//!
//! ```text
//! seed (SEED_SIZE bytes)
//! ↓
//! C[0][0], C[0][1], ..., C[m-1][n-1]   (i32 LE each, row-major)
//! ```
//!
//! These bytes are the only thing hashed or submitted as proof of work.

use crate::config::SEED_SIZE;
use crate::error::{Result, UpowError};
use crate::seed::Seed;
use crate::types::{Matrix, Shape};
use byteorder::{ByteOrder, LittleEndian};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    bytes: Vec<u8>,
}

impl Solution {
    pub fn encode(seed: &Seed, result: &Matrix<i32>) -> Self {
        let values = result.as_slice();
        let mut bytes = vec![0u8; SEED_SIZE + values.len() * 4];
        bytes[..SEED_SIZE].copy_from_slice(seed.as_bytes());
        LittleEndian::write_i32_into(values, &mut bytes[SEED_SIZE..]);
        Self { bytes }
    }

    pub fn expected_len(shape: Shape) -> usize {
        SEED_SIZE + shape.c_len() * 4
    }

    /// Splits solution bytes back into the seed and the `m x n` result.
    pub fn decode(bytes: &[u8], shape: Shape) -> Result<(Seed, Matrix<i32>)> {
        let expected = Self::expected_len(shape);
        if bytes.len() != expected {
            return Err(UpowError::Format(format!(
                "Solution size is {} bytes, expected {} for {}x{}",
                bytes.len(),
                expected,
                shape.m,
                shape.n
            )));
        }
        let seed = Seed::from_bytes(&bytes[..SEED_SIZE])?;
        let mut values = vec![0i32; shape.c_len()];
        LittleEndian::read_i32_into(&bytes[SEED_SIZE..], &mut values);
        Ok((seed, Matrix::from_vec(shape.m, shape.n, values)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    pub fn blake3_hex(&self) -> String {
        blake3::hash(&self.bytes).to_hex().to_string()
    }

    /// Writes the raw bytes, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

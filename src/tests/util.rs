// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::types::Matrix;

/// A simple deterministic RNG for tests.
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed, inc: 1 }
    }

    pub fn next_u32(&mut self) -> u32 {
        let oldstate = self.state;
        self.state = oldstate.wrapping_mul(6364136223846793005).wrapping_add(self.inc);
        let xorshifted = (((oldstate >> 18) ^ oldstate) >> 27) as u32;
        let rot = (oldstate >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn matrix_u8(&mut self, rows: usize, cols: usize) -> Matrix<u8> {
        let data = (0..rows * cols).map(|_| self.next_u32() as u8).collect();
        Matrix::from_vec(rows, cols, data).unwrap()
    }

    pub fn matrix_i8(&mut self, rows: usize, cols: usize) -> Matrix<i8> {
        let data = (0..rows * cols).map(|_| self.next_u32() as u8 as i8).collect();
        Matrix::from_vec(rows, cols, data).unwrap()
    }
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! upow-kernel: deterministic seeded matmul workloads and verifiable results.

pub mod config;
pub mod error;
pub mod types;
pub mod seed;
pub mod expand;
pub mod pad;
pub mod math;
pub mod backend;
pub mod executor;
pub mod solution;
pub mod artifact;
pub mod results;
pub mod provenance;
pub mod pipeline;
pub mod verify;

pub use error::{Result, UpowError};
pub use seed::{Seed, SeedChain, SeedSource};
pub use types::{Matrix, Shape};

#[cfg(test)]
pub mod tests;

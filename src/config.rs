// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants.

/// Size in bytes of a verifier-issued seed.
pub const SEED_SIZE: usize = 240;

/// Rows of operand A and of the result.
pub const M_DIM: usize = 16;

/// Columns of operand B and of the result.
pub const N_DIM: usize = 16;

/// Shared inner dimension.
pub const K_DIM: usize = 50240;

/// Tile alignment required by tiled backends on the M and N axes.
pub const TILE: usize = 32;

/// Offset added to unsigned operands to map them into the signed range.
pub const BIAS: i32 = 128;

/// Output artifact header: three little-endian i32 (m, n, k).
pub const HEADER_SIZE: usize = 12;

/// Read granularity for streaming file hashes.
pub const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Number of random bytes behind a provenance run id.
pub const RUN_ID_BYTES: usize = 8;

/// Environment fallback holding the seed as hex.
pub const SEED_HEX_ENV: &str = "SEED_HEX";

/// Environment fallback holding a path to the raw seed file.
pub const SEED_BIN_ENV: &str = "SEED_BIN";

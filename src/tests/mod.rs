#[cfg(test)]
// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod util;
pub mod determinism_tests;
pub mod e2e_tests;

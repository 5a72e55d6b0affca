// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Provenance records.
//!
//! A record binds one benchmark run to the exact bytes it produced:
//!
//! ```text
//! run_id        8 random bytes, hex
//! timestamp     epoch seconds
//! results_hash  SHA-256(results file)
//! artifact_hash SHA-256(artifact header || payload)
//! results       the results document, embedded
//! ```
//!
//! Time and randomness come from injected [`Clock`] and [`Entropy`] sources so
//! a record can be reproduced byte for byte under test.

use crate::artifact::{hash_artifact, hash_file};
use crate::config::RUN_ID_BYTES;
use crate::error::{Result, UpowError};
use crate::results::load_json_file;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    fn now_secs(&self) -> u64;
}

pub trait Entropy {
    fn fill(&mut self, buf: &mut [u8]);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub run_id: String,
    pub timestamp: u64,
    pub results_hash: String,
    pub artifact_hash: String,
    pub results: Value,
}

/// Outcome of re-hashing the files a record points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashCheck {
    pub results_hash: String,
    pub artifact_hash: String,
    pub results_match: bool,
    pub artifact_match: bool,
}

impl HashCheck {
    pub fn is_valid(&self) -> bool {
        self.results_match && self.artifact_match
    }
}

impl ProvenanceRecord {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| UpowError::serialization(e, self.run_id.clone()))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| UpowError::serialization(e, raw))
    }

    /// Recomputes both digests and compares them with the stored ones.
    pub fn check_files(&self, results_path: impl AsRef<Path>, artifact_path: impl AsRef<Path>) -> Result<HashCheck> {
        let results_hash = hash_file(results_path)?.to_hex();
        let (_, artifact) = hash_artifact(artifact_path)?;
        let artifact_hash = artifact.to_hex();
        Ok(HashCheck {
            results_match: results_hash == self.results_hash,
            artifact_match: artifact_hash == self.artifact_hash,
            results_hash,
            artifact_hash,
        })
    }
}

fn hash_inputs(results_path: &Path, artifact_path: &Path) -> Result<(String, String)> {
    let results_hash = hash_file(results_path)?.to_hex();
    let (_, artifact) = hash_artifact(artifact_path)?;
    Ok((results_hash, artifact.to_hex()))
}

pub struct ProvenanceBuilder<C: Clock, E: Entropy> {
    clock: C,
    entropy: E,
}

impl ProvenanceBuilder<SystemClock, OsEntropy> {
    pub fn system() -> Self {
        Self::new(SystemClock, OsEntropy)
    }
}

impl<C: Clock, E: Entropy> ProvenanceBuilder<C, E> {
    pub fn new(clock: C, entropy: E) -> Self {
        Self { clock, entropy }
    }

    fn run_id(&mut self) -> String {
        let mut bytes = [0u8; RUN_ID_BYTES];
        self.entropy.fill(&mut bytes);
        hex::encode(bytes)
    }

    /// Builds a record around an already-loaded results object.
    pub fn build(
        &mut self,
        results: Value,
        results_path: impl AsRef<Path>,
        artifact_path: impl AsRef<Path>,
    ) -> Result<ProvenanceRecord> {
        let (results_hash, artifact_hash) =
            hash_inputs(results_path.as_ref(), artifact_path.as_ref()).map_err(|e| {
                UpowError::ProvenanceBuildFailed {
                    source: Box::new(e),
                }
            })?;

        let record = ProvenanceRecord {
            run_id: self.run_id(),
            timestamp: self.clock.now_secs(),
            results_hash,
            artifact_hash,
            results,
        };
        tracing::info!(
            run_id = %record.run_id,
            results_hash = %record.results_hash,
            artifact_hash = %record.artifact_hash,
            "Provenance record built"
        );
        Ok(record)
    }

    /// Loads the results file, then builds the record.
    pub fn build_from_files(
        &mut self,
        results_path: impl AsRef<Path>,
        artifact_path: impl AsRef<Path>,
    ) -> Result<ProvenanceRecord> {
        let results = load_json_file(results_path.as_ref()).map_err(|e| {
            UpowError::ProvenanceBuildFailed {
                source: Box::new(e),
            }
        })?;
        self.build(results, results_path, artifact_path)
    }

    /// Builds and persists the record as pretty JSON.
    pub fn build_and_write(
        &mut self,
        results_path: impl AsRef<Path>,
        artifact_path: impl AsRef<Path>,
        out_path: impl AsRef<Path>,
    ) -> Result<ProvenanceRecord> {
        let record = self.build_from_files(results_path, artifact_path)?;
        record.write_to(out_path).map_err(|e| UpowError::ProvenanceBuildFailed {
            source: Box::new(e),
        })?;
        Ok(record)
    }
}

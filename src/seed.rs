// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Seed loading and validation.
//!
//! A seed can come from several places. They are modelled as an ordered chain
//! of named sources; each source either yields bytes or reports "not present",
//! and the first present source wins. The size check runs on whatever the
//! winning source produced.

use crate::config::{SEED_BIN_ENV, SEED_HEX_ENV, SEED_SIZE};
use crate::error::{Result, UpowError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Verifier-issued seed of exactly `SEED_SIZE` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_SIZE]);

impl Seed {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; SEED_SIZE] = bytes.try_into().map_err(|_| {
            UpowError::InvalidInput(format!(
                "Seed size mismatch. Expected {} bytes, got {}.",
                SEED_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Seed(arr))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_bytes(&parse_hex(hex_str)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}..)", hex::encode(&self.0[..4]))
    }
}

/// Decodes hex, ignoring ASCII whitespace and an optional `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    hex::decode(digits).map_err(|e| UpowError::InvalidInput(format!("Invalid seed hex: {}", e)))
}

/// One place a seed may be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// Hex passed explicitly (e.g. `--seed-hex`).
    Hex(Option<String>),
    /// Raw binary file passed explicitly (e.g. `--seed-bin`).
    File(Option<PathBuf>),
    /// Environment variable holding hex.
    EnvHex(String),
    /// Environment variable holding a path to a raw binary file.
    EnvFile(String),
}

impl SeedSource {
    pub fn name(&self) -> String {
        match self {
            SeedSource::Hex(_) => "--seed-hex".to_string(),
            SeedSource::File(_) => "--seed-bin".to_string(),
            SeedSource::EnvHex(var) | SeedSource::EnvFile(var) => format!("${}", var),
        }
    }

    /// Returns `Ok(None)` when the source is not present. Empty values count
    /// as not present.
    pub fn fetch(&self, env: &dyn Fn(&str) -> Option<String>) -> Result<Option<Vec<u8>>> {
        match self {
            SeedSource::Hex(value) => match non_empty(value.clone()) {
                Some(hex_str) => parse_hex(&hex_str).map(Some),
                None => Ok(None),
            },
            SeedSource::File(path) => match path {
                Some(p) if !p.as_os_str().is_empty() => read_seed_file(p).map(Some),
                _ => Ok(None),
            },
            SeedSource::EnvHex(var) => match non_empty(env(var)) {
                Some(hex_str) => parse_hex(&hex_str).map(Some),
                None => Ok(None),
            },
            SeedSource::EnvFile(var) => match non_empty(env(var)) {
                Some(path) => read_seed_file(&PathBuf::from(path)).map(Some),
                None => Ok(None),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn read_seed_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        UpowError::InvalidInput(format!("Failed to read seed file {}: {}", path.display(), e))
    })
}

/// Ordered list of seed sources. First present source wins.
#[derive(Debug, Clone, Default)]
pub struct SeedChain {
    sources: Vec<SeedSource>,
}

impl SeedChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard precedence: explicit hex, explicit file, `$SEED_HEX`, `$SEED_BIN`.
    pub fn standard(hex: Option<String>, file: Option<PathBuf>) -> Self {
        Self::new()
            .with(SeedSource::Hex(hex))
            .with(SeedSource::File(file))
            .with(SeedSource::EnvHex(SEED_HEX_ENV.to_string()))
            .with(SeedSource::EnvFile(SEED_BIN_ENV.to_string()))
    }

    pub fn with(mut self, source: SeedSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> &[SeedSource] {
        &self.sources
    }

    /// Resolves against the process environment.
    pub fn resolve(&self) -> Result<Seed> {
        self.resolve_with(&|var| std::env::var(var).ok())
    }

    pub fn resolve_with(&self, env: &dyn Fn(&str) -> Option<String>) -> Result<Seed> {
        for source in &self.sources {
            if let Some(bytes) = source.fetch(env)? {
                tracing::debug!(source = %source.name(), len = bytes.len(), "Seed source selected");
                return Seed::from_bytes(&bytes);
            }
        }
        let names: Vec<String> = self.sources.iter().map(SeedSource::name).collect();
        Err(UpowError::InvalidInput(format!(
            "Missing seed. Provide one of: {}",
            names.join(", ")
        )))
    }
}

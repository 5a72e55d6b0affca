// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Benchmark results document.

use crate::error::{Result, UpowError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One native run: whatever metrics the binary reported, plus the digest of
/// the artifact it wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(flatten)]
    pub metrics: Map<String, Value>,
    pub output_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub m: u32,
    pub n: u32,
    pub k: u32,
    pub algo: String,
    pub blocks: Vec<u32>,
    pub runs: u32,
    pub results: Vec<RunRecord>,
}

impl BenchmarkResults {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| UpowError::serialization(e, format!("{:?}", self)))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Parses `"32, 64,,128"` into `[32, 64, 128]`; empty items are skipped.
pub fn parse_blocks(value: &str) -> Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u32>()
                .map_err(|e| UpowError::InvalidInput(format!("Invalid block size '{}': {}", v, e)))
        })
        .collect()
}

/// Parses a JSON object; on failure the offending text is kept in the error.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(UpowError::serialization(
            format!("expected a JSON object, got {}", json_kind(&other)),
            raw,
        )),
        Err(e) => Err(UpowError::serialization(e, raw)),
    }
}

/// Reads any JSON document from disk.
pub fn load_json_file(path: impl AsRef<Path>) -> Result<Value> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| UpowError::serialization(e, raw))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

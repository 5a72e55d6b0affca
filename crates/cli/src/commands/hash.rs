// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use std::path::Path;
use upow_kernel::artifact::{hash_artifact, hash_file};

/// Prints the SHA-256 of `path`. With `artifact`, the header rule applies.
pub fn run(path: &Path, artifact: bool) -> anyhow::Result<()> {
    println!("{}", digest(path, artifact)?);
    Ok(())
}

pub fn digest(path: &Path, artifact: bool) -> anyhow::Result<String> {
    let hex = if artifact {
        let (header, digest) = hash_artifact(path)
            .with_context(|| format!("Failed to hash artifact {}", path.display()))?;
        tracing::debug!(m = header.m, n = header.n, k = header.k, "Artifact header");
        digest.to_hex()
    } else {
        hash_file(path)
            .with_context(|| format!("Failed to hash {}", path.display()))?
            .to_hex()
    };
    Ok(hex)
}

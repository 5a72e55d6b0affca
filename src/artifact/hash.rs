// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! SHA-256 file digests.
//!
//! Two rules:
//! - artifacts: `SHA-256(header || payload)`, with the header validated first
//!   so that a truncated file is rejected instead of hashed;
//! - anything else: `SHA-256(file bytes)`.
//!
//! Both stream in `HASH_CHUNK_SIZE` chunks.

use super::header::ArtifactHeader;
use crate::config::HASH_CHUNK_SIZE;
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest(pub [u8; 32]);

impl Sha256Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn update_from<R: Read>(hasher: &mut Sha256, mut reader: R) -> io::Result<()> {
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(())
}

pub fn hash_reader<R: Read>(reader: R) -> io::Result<Sha256Digest> {
    let mut hasher = Sha256::new();
    update_from(&mut hasher, reader)?;
    Ok(Sha256Digest(hasher.finalize().into()))
}

/// Digest of the full file content.
pub fn hash_file(path: impl AsRef<Path>) -> Result<Sha256Digest> {
    let file = File::open(path)?;
    Ok(hash_reader(file)?)
}

/// Digest of header || payload. Fails with `Format` if the header is short.
pub fn hash_artifact(path: impl AsRef<Path>) -> Result<(ArtifactHeader, Sha256Digest)> {
    let mut file = File::open(path)?;
    let header = ArtifactHeader::read_from(&mut file)?;

    let mut hasher = Sha256::new();
    hasher.update(header.to_bytes());
    update_from(&mut hasher, file)?;
    Ok((header, Sha256Digest(hasher.finalize().into())))
}

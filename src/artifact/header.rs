// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Output artifact container.
//!
//! ```text
//! [m: i32 LE][n: i32 LE][k: i32 LE][payload ...]
//! ```

use crate::config::HEADER_SIZE;
use crate::error::{Result, UpowError};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub m: i32,
    pub n: i32,
    pub k: i32,
}

impl ArtifactHeader {
    pub const SIZE: usize = HEADER_SIZE;

    pub fn new(m: i32, n: i32, k: i32) -> Self {
        Self { m, n, k }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.m.to_le_bytes());
        buf[4..8].copy_from_slice(&self.n.to_le_bytes());
        buf[8..12].copy_from_slice(&self.k.to_le_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(UpowError::Format(format!(
                "Output file too small: {} bytes, header needs {}",
                bytes.len(),
                Self::SIZE
            )));
        }
        Self::read_from(&bytes[..Self::SIZE])
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut read = || -> io::Result<Self> {
            let m = reader.read_i32::<LittleEndian>()?;
            let n = reader.read_i32::<LittleEndian>()?;
            let k = reader.read_i32::<LittleEndian>()?;
            Ok(Self { m, n, k })
        };
        read().map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                UpowError::Format("Output file too small for header".to_string())
            }
            _ => UpowError::Io(e),
        })
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.m)?;
        writer.write_i32::<LittleEndian>(self.n)?;
        writer.write_i32::<LittleEndian>(self.k)?;
        Ok(())
    }
}

pub fn write_artifact(path: impl AsRef<Path>, header: ArtifactHeader, payload: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    header.write_to(&mut file)?;
    file.write_all(payload)?;
    file.sync_data()?;
    Ok(())
}

pub fn read_artifact(path: impl AsRef<Path>) -> Result<(ArtifactHeader, Vec<u8>)> {
    let mut file = File::open(path)?;
    let header = ArtifactHeader::read_from(&mut file)?;
    let mut payload = Vec::new();
    file.read_to_end(&mut payload)?;
    Ok((header, payload))
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpowError {
    /// Bad seed size or source, malformed dimensions or arguments.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Artifact or solution bytes do not match the expected layout.
    #[error("Format error: {0}")]
    Format(String),

    /// No usable device, or the adapter lacks a required dtype/layout.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A device call or native subprocess failed. Carries its output verbatim.
    #[error("Backend execution failed: {0}")]
    BackendExecution(String),

    #[error("Serialization error: {message}\n--- raw ---\n{raw}")]
    Serialization { message: String, raw: String },

    #[error("Provenance build failed: {source}")]
    ProvenanceBuildFailed {
        #[source]
        source: Box<UpowError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpowError {
    pub fn serialization(err: impl std::fmt::Display, raw: impl Into<String>) -> Self {
        UpowError::Serialization {
            message: err.to_string(),
            raw: raw.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UpowError>;

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid submission config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SubmitError>;

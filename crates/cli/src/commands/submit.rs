// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use std::path::Path;
use upow_client::{SubmissionClient, SubmitConfig};
use upow_kernel::results::load_json_file;

/// Posts a JSON file as-is and prints the response body.
pub fn run(payload: &Path, config: SubmitConfig) -> anyhow::Result<()> {
    let value = load_json_file(payload)
        .with_context(|| format!("Failed to load {}", payload.display()))?;
    let client = SubmissionClient::new(config)?;
    let response = client.submit(&value)?;
    println!("{}", response);
    Ok(())
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;
use upow_client::{SubmissionClient, SubmitConfig};
use upow_kernel::provenance::{ProvenanceBuilder, ProvenanceRecord};

/// Builds and writes the record; uploads it when a config is given.
pub fn run(
    results: &Path,
    artifact: &Path,
    out: &Path,
    submit: Option<SubmitConfig>,
) -> anyhow::Result<ProvenanceRecord> {
    let record = ProvenanceBuilder::system().build_and_write(results, artifact, out)?;

    match submit {
        Some(config) => {
            let client = SubmissionClient::new(config)?;
            let response = client.submit(&record)?;
            println!("{}", response);
        }
        None => println!("{}", out.display()),
    }
    Ok(record)
}

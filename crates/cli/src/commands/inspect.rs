// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use std::path::Path;
use upow_kernel::artifact::{hash_artifact, ArtifactHeader};
use upow_kernel::provenance::ProvenanceRecord;

fn match_label(ok: bool) -> &'static str {
    if ok {
        "MATCH"
    } else {
        "MISMATCH"
    }
}

fn artifact_rows(table: &mut Table, path: &Path) {
    if !path.exists() {
        table.add_row(vec!["Artifact", "MISSING", &path.display().to_string()]);
        return;
    }
    match hash_artifact(path) {
        Ok((header, digest)) => {
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or_default();
            let payload = size.saturating_sub(ArtifactHeader::SIZE as u64);
            let msg = format!(
                "m: {}, n: {}, k: {}, payload: {} bytes",
                header.m, header.n, header.k, payload
            );
            table.add_row(vec!["Artifact", "FOUND", &msg]);
            table.add_row(vec!["Artifact SHA-256", "", &digest.to_hex()]);
        }
        Err(e) => {
            table.add_row(vec!["Artifact", "CORRUPT", &e.to_string()]);
        }
    }
}

fn provenance_rows(
    table: &mut Table,
    path: &Path,
    results: Option<&Path>,
    artifact: Option<&Path>,
) {
    let record = match ProvenanceRecord::read_from(path) {
        Ok(r) => r,
        Err(e) => {
            table.add_row(vec!["Provenance", "CORRUPT", &e.to_string()]);
            return;
        }
    };

    let ts = chrono::DateTime::from_timestamp(record.timestamp as i64, 0)
        .unwrap_or_default()
        .to_rfc3339();
    table.add_row(vec!["Provenance", "FOUND", &format!("run {} at {}", record.run_id, ts)]);
    table.add_row(vec!["Results hash", "", &record.results_hash]);
    table.add_row(vec!["Artifact hash", "", &record.artifact_hash]);

    if let (Some(results), Some(artifact)) = (results, artifact) {
        match record.check_files(results, artifact) {
            Ok(check) => {
                table.add_row(vec!["Results file", match_label(check.results_match), &check.results_hash]);
                table.add_row(vec!["Artifact file", match_label(check.artifact_match), &check.artifact_hash]);
            }
            Err(e) => {
                table.add_row(vec!["Hash check", "ERROR", &e.to_string()]);
            }
        }
    }
}

pub fn run(
    artifact: Option<&Path>,
    provenance: Option<&Path>,
    results: Option<&Path>,
) -> anyhow::Result<()> {
    if artifact.is_none() && provenance.is_none() {
        anyhow::bail!("Nothing to inspect: pass --artifact and/or --provenance");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Item", "Status", "Details"]);

    if let Some(path) = artifact {
        artifact_rows(&mut table, path);
    }
    if let Some(path) = provenance {
        provenance_rows(&mut table, path, results, artifact);
    }

    println!("{table}");
    Ok(())
}

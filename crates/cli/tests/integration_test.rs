// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use upow_cli::commands::{hash, inspect, provenance, solve};
use upow_kernel::artifact::{hash_artifact, write_artifact, ArtifactHeader};
use upow_kernel::backend::BackendKind;
use upow_kernel::config::SEED_SIZE;
use upow_kernel::provenance::ProvenanceRecord;
use upow_kernel::verify::verify_solution;
use upow_kernel::Shape;

fn solve_opts(seed_bin: PathBuf, backend: BackendKind, out: Option<PathBuf>) -> solve::SolveOptions {
    solve::SolveOptions {
        seed_hex: None,
        seed_bin: Some(seed_bin),
        shape: Shape::new(16, 16, 640).unwrap(),
        backend,
        device_id: 0,
        out,
    }
}

fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let results = dir.join("results.json");
    std::fs::write(&results, r#"{"m":4,"n":4,"k":4,"algo":"naive","blocks":[],"runs":1,"results":[]}"#).unwrap();
    let artifact = dir.join("out.bin");
    write_artifact(&artifact, ArtifactHeader::new(4, 4, 4), &[3u8; 64]).unwrap();
    (results, artifact)
}

#[test]
fn test_solve_writes_verifiable_solution() {
    let dir = tempdir().unwrap();
    let seed_path = dir.path().join("seed.bin");
    std::fs::write(&seed_path, [0x42u8; SEED_SIZE]).unwrap();
    let out = dir.path().join("nested").join("solution.bin");

    let signed = solve::execute(&solve_opts(seed_path.clone(), BackendKind::CpuSigned, Some(out.clone()))).unwrap();
    let mixed = solve::execute(&solve_opts(seed_path, BackendKind::CpuMixed, None)).unwrap();

    assert_eq!(signed.strategy, "corrected");
    assert_eq!(mixed.strategy, "direct");
    assert_eq!(signed.solution, mixed.solution);
    assert_eq!(signed.bytes, SEED_SIZE + 16 * 16 * 4);

    let bytes = std::fs::read(&out).unwrap();
    let report = verify_solution(&bytes, Shape::new(16, 16, 640).unwrap()).unwrap();
    assert!(report.valid);
    assert_eq!(report.sha256, signed.sha256);
}

#[test]
fn test_solve_rejects_short_seed() {
    let dir = tempdir().unwrap();
    let seed_path = dir.path().join("seed.bin");
    std::fs::write(&seed_path, [0u8; SEED_SIZE - 1]).unwrap();
    let result = solve::execute(&solve_opts(seed_path, BackendKind::CpuSigned, None));
    assert!(result.is_err());
}

#[test]
fn test_hash_rules() {
    let dir = tempdir().unwrap();
    let (results, artifact) = write_fixtures(dir.path());

    let whole = hash::digest(&artifact, false).unwrap();
    let with_header = hash::digest(&artifact, true).unwrap();
    assert_eq!(whole, with_header);
    assert_eq!(with_header, hash_artifact(&artifact).unwrap().1.to_hex());

    // A plain file has no header to validate.
    let short = dir.path().join("short.txt");
    std::fs::write(&short, b"abc").unwrap();
    assert_eq!(
        hash::digest(&short, false).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert!(hash::digest(&short, true).is_err());
    assert!(hash::run(&results, false).is_ok());
}

#[test]
fn test_provenance_and_inspect_workflow() {
    let dir = tempdir().unwrap();
    let (results, artifact) = write_fixtures(dir.path());
    let out = dir.path().join("provenance.json");

    let record = provenance::run(&results, &artifact, &out, None).unwrap();
    assert_eq!(record.run_id.len(), 16);
    assert_eq!(ProvenanceRecord::read_from(&out).unwrap(), record);
    assert!(record.check_files(&results, &artifact).unwrap().is_valid());

    let result = inspect::run(Some(artifact.as_path()), Some(out.as_path()), Some(results.as_path()));
    assert!(result.is_ok());

    // Corrupt inputs are reported in the table, not raised.
    let bad = dir.path().join("bad.bin");
    std::fs::write(&bad, [1u8; 3]).unwrap();
    assert!(inspect::run(Some(bad.as_path()), None, None).is_ok());

    assert!(inspect::run(None, None, None).is_err());
}

#[test]
fn test_provenance_missing_artifact_fails() {
    let dir = tempdir().unwrap();
    let (results, _) = write_fixtures(dir.path());
    let out = dir.path().join("provenance.json");
    let missing = dir.path().join("missing.bin");
    assert!(provenance::run(&results, &missing, &out, None).is_err());
    assert!(!out.exists());
}

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::artifact::{hash_artifact, write_artifact, ArtifactHeader};
use crate::backend::BackendKind;
use crate::config::SEED_SIZE;
use crate::error::UpowError;
use crate::executor::build_executor;
use crate::pipeline::solve;
use crate::provenance::{Clock, Entropy, ProvenanceBuilder};
use crate::results::{BenchmarkResults, RunRecord};
use crate::seed::Seed;
use crate::solution::Solution;
use crate::types::Shape;
use crate::verify::verify_solution;
use serde_json::Map;
use sha2::{Digest, Sha256};
use tempfile::tempdir;

struct Epoch;

impl Clock for Epoch {
    fn now_secs(&self) -> u64 {
        0
    }
}

struct Zeros;

impl Entropy for Zeros {
    fn fill(&mut self, buf: &mut [u8]) {
        buf.fill(0);
    }
}

fn zero_seed() -> Seed {
    Seed::from_bytes(&[0u8; SEED_SIZE]).unwrap()
}

#[test]
fn test_zero_seed_full_run_is_reproducible() {
    let seed = zero_seed();
    let mut first_exec = build_executor(BackendKind::CpuSigned).unwrap();
    let mut second_exec = build_executor(BackendKind::CpuSigned).unwrap();

    let first = solve(&seed, Shape::UPOW, &mut *first_exec, 0).unwrap();
    let second = solve(&seed, Shape::UPOW, &mut *second_exec, 0).unwrap();

    assert_eq!(first.solution.len(), 1264);
    assert_eq!(first.solution.to_hex(), second.solution.to_hex());
    assert_eq!(&first.solution.as_bytes()[..SEED_SIZE], &[0u8; SEED_SIZE][..]);
    assert_eq!(first.strategy, "corrected");
}

#[test]
fn test_strategies_agree_on_full_shape() {
    let seed = Seed::from_bytes(&[0x3Cu8; SEED_SIZE]).unwrap();
    let mut signed = build_executor(BackendKind::CpuSigned).unwrap();
    let mut mixed = build_executor(BackendKind::CpuMixed).unwrap();

    let a = solve(&seed, Shape::UPOW, &mut *signed, 0).unwrap();
    let b = solve(&seed, Shape::UPOW, &mut *mixed, 0).unwrap();
    assert_eq!(a.solution, b.solution);
    assert_eq!(b.strategy, "direct");
}

#[test]
fn test_solution_verifies_and_tampering_is_caught() {
    let seed = zero_seed();
    let mut executor = build_executor(BackendKind::CpuMixed).unwrap();
    let outcome = solve(&seed, Shape::UPOW, &mut *executor, 0).unwrap();

    let report = verify_solution(outcome.solution.as_bytes(), Shape::UPOW).unwrap();
    assert!(report.valid);
    assert_eq!(report.first_mismatch, None);
    assert_eq!(report.sha256, outcome.solution.sha256_hex());
    assert_eq!(report.blake3, outcome.solution.blake3_hex());
    assert_eq!(report.expected_sha256, report.sha256);
    let sha256_of_original = report.sha256.clone();

    let mut tampered = outcome.solution.into_bytes();
    let idx = SEED_SIZE + 4 * 17;
    tampered[idx] ^= 0x01;
    let report = verify_solution(&tampered, Shape::UPOW).unwrap();
    assert!(!report.valid);
    assert_eq!(report.first_mismatch, Some(17));
    assert_eq!(report.sha256, hex::encode(Sha256::digest(&tampered)));
    assert_eq!(report.blake3, blake3::hash(&tampered).to_hex().to_string());
    assert_eq!(report.expected_sha256, sha256_of_original);
    assert_ne!(report.sha256, report.expected_sha256);

    assert!(matches!(
        verify_solution(&tampered[..100], Shape::UPOW),
        Err(UpowError::Format(_))
    ));
}

#[test]
fn test_solution_decodes_to_result() {
    let seed = Seed::from_bytes(&[9u8; SEED_SIZE]).unwrap();
    let shape = Shape::new(3, 5, 40).unwrap();
    let mut executor = build_executor(BackendKind::CpuSigned).unwrap();
    let outcome = solve(&seed, shape, &mut *executor, 0).unwrap();

    let (decoded_seed, decoded) = Solution::decode(outcome.solution.as_bytes(), shape).unwrap();
    assert_eq!(decoded_seed, seed);
    assert_eq!(decoded, outcome.result);
}

#[test]
fn test_results_and_provenance_are_reproducible() {
    let seed = zero_seed();
    let shape = Shape::new(16, 16, 512).unwrap();
    let mut hashes = Vec::new();

    for _ in 0..2 {
        let dir = tempdir().unwrap();
        let mut executor = build_executor(BackendKind::CpuSigned).unwrap();
        let outcome = solve(&seed, shape, &mut *executor, 0).unwrap();

        let artifact = dir.path().join("out.bin");
        let payload = &outcome.solution.as_bytes()[SEED_SIZE..];
        write_artifact(&artifact, ArtifactHeader::new(16, 16, 512), payload).unwrap();
        let (_, digest) = hash_artifact(&artifact).unwrap();

        let mut metrics = Map::new();
        metrics.insert("strategy".to_string(), outcome.strategy.into());
        let results = BenchmarkResults {
            m: 16,
            n: 16,
            k: 512,
            algo: "tiled".to_string(),
            blocks: vec![32],
            runs: 1,
            results: vec![RunRecord {
                metrics,
                output_hash: digest.to_hex(),
            }],
        };
        let results_path = dir.path().join("results.json");
        results.write_to(&results_path).unwrap();

        let record = ProvenanceBuilder::new(Epoch, Zeros)
            .build_from_files(&results_path, &artifact)
            .unwrap();
        let json = record.to_json_pretty().unwrap();
        hashes.push((
            outcome.solution.to_hex(),
            record.results_hash,
            record.artifact_hash,
            json,
        ));
    }

    assert_eq!(hashes[0], hashes[1]);
}

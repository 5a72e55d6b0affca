// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::SEED_SIZE;
use crate::expand::{expand, expand_stream};
use crate::seed::Seed;
use crate::types::Shape;

#[test]
fn test_stream_is_blake3_xof() {
    // The first 32 XOF bytes are the plain BLAKE3 digest.
    let stream = expand_stream(&[], 32);
    assert_eq!(
        hex::encode(stream),
        "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
    );
}

#[test]
fn test_stream_prefix_stable() {
    let seed = [0x5Au8; SEED_SIZE];
    let short = expand_stream(&seed, 100);
    let long = expand_stream(&seed, 10_000);
    assert_eq!(&long[..100], &short[..]);
}

#[test]
fn test_expand_is_deterministic() {
    let seed = Seed::from_bytes(&[0x11u8; SEED_SIZE]).unwrap();
    let shape = Shape::new(3, 5, 7).unwrap();
    let first = expand(&seed, shape).unwrap();
    let second = expand(&seed, shape).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_a_then_b_split() {
    let seed = Seed::from_bytes(&[0x22u8; SEED_SIZE]).unwrap();
    let shape = Shape::new(2, 3, 4).unwrap();
    let pair = expand(&seed, shape).unwrap();
    let stream = expand_stream(seed.as_bytes(), shape.a_len() + shape.b_len());

    assert_eq!((pair.a.rows(), pair.a.cols()), (2, 4));
    assert_eq!((pair.b.rows(), pair.b.cols()), (4, 3));
    assert_eq!(pair.a.as_slice(), &stream[..8]);
    let b_raw: Vec<u8> = pair.b.as_slice().iter().map(|&v| v as u8).collect();
    assert_eq!(b_raw, &stream[8..20]);
}

#[test]
fn test_distinct_seeds_distinct_workloads() {
    let shape = Shape::new(4, 4, 16).unwrap();
    let mut bytes = [0u8; SEED_SIZE];
    let a = expand(&Seed::from_bytes(&bytes).unwrap(), shape).unwrap();
    bytes[SEED_SIZE - 1] = 1;
    let b = expand(&Seed::from_bytes(&bytes).unwrap(), shape).unwrap();
    assert_ne!(a.a, b.a);
    assert_ne!(a.b, b.b);
}

#[test]
fn test_invalid_shape_rejected() {
    let seed = Seed::from_bytes(&[0u8; SEED_SIZE]).unwrap();
    let shape = Shape { m: 0, n: 1, k: 1 };
    assert!(expand(&seed, shape).is_err());
}

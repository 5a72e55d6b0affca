// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod header;
pub mod hash;

pub use hash::{hash_artifact, hash_file, hash_reader, Sha256Digest};
pub use header::{read_artifact, write_artifact, ArtifactHeader};

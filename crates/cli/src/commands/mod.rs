// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod bench;
pub mod hash;
pub mod inspect;
pub mod provenance;
pub mod solve;
pub mod submit;

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod matrix;
pub mod shape;

pub use matrix::Matrix;
pub use shape::Shape;

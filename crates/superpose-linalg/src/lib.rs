#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Module to calculate the eigen-decomposition of a symmetric 4x4 matrix.
pub mod eigen;

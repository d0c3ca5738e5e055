#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::AlignError;

mod horn;
pub use horn::{align, align_into, fit_alignment, HornFit};

/// Linear algebra utilities.
pub mod linalg;

/// 3D transforms algorithms.
pub mod transforms;

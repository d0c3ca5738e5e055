/// An error type for the alignment operations.
#[derive(thiserror::Error, Debug)]
pub enum AlignError {
    /// Error when input lengths disagree.
    #[error("Input lengths disagree ({0} vs {1})")]
    DimensionMismatch(usize, usize),

    /// Error when the input point sets are empty.
    #[error("Input point sets are empty")]
    EmptyInput,

    /// Error when a weight sum is not strictly positive.
    #[error("Weight sum must be strictly positive, got {0}")]
    InvalidWeight(f64),
}

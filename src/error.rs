//! Error types for astral.

use thiserror::Error;

use crate::scalars::MAX_NUM_SHELLS;

/// Errors that can occur during engine construction or queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// Dimensionality is zero, or a query vector's length does not
    /// match the engine's dimensionality.
    #[error("invalid dimensionality: {0}")]
    InvalidDim(usize),

    /// More extended shells requested than the probe-count table covers.
    #[error("invalid number of shells: {0} (maximum is {MAX_NUM_SHELLS})")]
    InvalidNumShells(u32),

    /// Packing radius must be a positive finite number.
    #[error("invalid packing radius: {0}")]
    InvalidPackingRadius(f64),

    /// An allocation could not be satisfied.
    #[error("memory exhausted")]
    MemoryExhausted,

    /// A query checked out more work buffers than its stack holds.
    #[error("work buffer stack exhausted")]
    InsufficientBuffers,

    /// A sink reported failure; the query stops at the first such error.
    #[error("sink error: {0}")]
    Callback(String),

    /// An internal consistency check failed. These are asserts on the
    /// engine's own invariants, not expected user errors.
    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}

/// Result type alias for astral operations.
pub type Result<T> = std::result::Result<T, LatticeError>;

impl From<std::collections::TryReserveError> for LatticeError {
    fn from(_: std::collections::TryReserveError) -> Self {
        LatticeError::MemoryExhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            LatticeError::InvalidDim(0).to_string(),
            "invalid dimensionality: 0"
        );
        assert_eq!(
            LatticeError::InvalidNumShells(31).to_string(),
            "invalid number of shells: 31 (maximum is 30)"
        );
        assert_eq!(
            LatticeError::InvalidPackingRadius(-1.0).to_string(),
            "invalid packing radius: -1"
        );
    }
}

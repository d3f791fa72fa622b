//! Error types for superimposition
//!
//! Every failure is reported synchronously to the caller; nothing is
//! retried or recovered inside the crate.

use thiserror::Error;

/// Errors from fitting or applying rigid-body transformations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// Coordinate array is neither a single model (n,3) nor a stack (m,n,3)
    #[error("Coordinates must be two- or three-dimensional, got {0} dimension(s)")]
    InvalidRank(usize),

    /// Last axis does not hold x, y, z
    #[error("Coordinates must have 3 components in the last dimension, got {0}")]
    NotCartesian(usize),

    /// Number of models differs from what the operation expects
    #[error("Model count mismatch: expected {expected}, got {actual}")]
    ModelCountMismatch { expected: usize, actual: usize },

    /// Fixed and mobile structures have different numbers of atoms
    #[error("Fixed and mobile structures have different atom counts: {0} vs {1}")]
    AtomCountMismatch(usize, usize),

    /// Boolean atom mask does not cover every atom exactly once
    #[error("Atom mask has length {mask}, but the structures have {atoms} atoms")]
    MaskLength { mask: usize, atoms: usize },

    /// Nothing left to fit on
    #[error("No atoms selected for superimposition")]
    NoAtoms,
}

impl AlignError {
    /// Create a model count mismatch error
    pub fn model_count(expected: usize, actual: usize) -> Self {
        AlignError::ModelCountMismatch { expected, actual }
    }

    /// Whether this is a shape error (wrong rank or wrong trailing axis)
    pub fn is_shape_error(&self) -> bool {
        matches!(self, AlignError::InvalidRank(_) | AlignError::NotCartesian(_))
    }

    /// Whether this is a size mismatch between models or atoms
    pub fn is_size_mismatch(&self) -> bool {
        matches!(
            self,
            AlignError::ModelCountMismatch { .. } | AlignError::AtomCountMismatch(..)
        )
    }
}

/// Result type for superimposition operations
pub type AlignResult<T> = Result<T, AlignError>;

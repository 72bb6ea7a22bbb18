//! Error types for encoding and enumeration

use crate::sat::SatError;
use thiserror::Error;

/// Errors surfaced by the constraint builder and the enumerator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueensError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A row evaluated to a value with more than one bit set
    #[error("row {row} evaluated to {value:#b}, which is not a single queen")]
    NotOneHot { row: usize, value: u64 },

    /// A decoded or reflected solution broke the placement rules
    #[error("solution {solution} is not a valid placement: {reason}")]
    InvalidSolution { solution: String, reason: String },

    /// The oracle stopped without deciding satisfiability
    #[error("the oracle could not decide whether more solutions exist")]
    Undecided,

    #[error(transparent)]
    Sat(#[from] SatError),
}

impl QueensError {
    /// Whether the error points at a defect in the encoding itself
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QueensError::NotOneHot { .. } | QueensError::InvalidSolution { .. } | QueensError::Sat(_)
        )
    }
}

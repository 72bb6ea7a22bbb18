//! SAT solving components: clauses, the CaDiCaL backend and the bit-vector layer on top

pub mod bitvec;
pub mod constraints;
pub mod solver;
pub mod variables;

pub use bitvec::{BitVec, BvOracle, Model};
pub use constraints::{Clause, Lit};
pub use solver::{CheckResult, SatBackend, SatSolver, SolverOptions};
pub use variables::VariableManager;

use thiserror::Error;

/// Errors raised while building or reading a bit-vector encoding
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SatError {
    #[error("cannot add an empty clause")]
    EmptyClause,

    #[error("operand widths differ: {left} and {right} bits")]
    WidthMismatch { left: usize, right: usize },

    #[error("bit {bit} is out of range for a {width}-bit vector")]
    BitOutOfRange { bit: usize, width: usize },

    #[error("a {width}-bit vector does not fit into a 64-bit value")]
    ValueTooWide { width: usize },

    #[error("no model is available; the last check was not satisfiable")]
    NoModel,
}

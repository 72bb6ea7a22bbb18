//! N-Queens encoding, symmetry expansion and enumeration

pub mod encoder;
pub mod enumerator;
pub mod position;
pub mod symmetry;
pub mod validator;

pub use encoder::{QueensEncoder, MAX_BOARD_SIZE};
pub use enumerator::{EnumerationStatistics, EnumeratorOptions, SolutionEnumerator};
pub use position::{Position, Solution};
pub use symmetry::Reflection;
pub use validator::{RuleViolation, SolutionValidator, ValidationResult};

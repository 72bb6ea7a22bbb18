//! Output helpers

pub mod display;

pub use display::{SolutionFormatter, DIVIDER};

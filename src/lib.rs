//! N-Queens enumeration over a bit-vector SAT encoding
//!
//! This library encodes the N-Queens rules as bit-vector constraints, solves
//! them with CaDiCaL and uses board reflections to get several solutions out
//! of every model.

pub mod config;
pub mod error;
pub mod queens;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::QueensError;
pub use queens::{EnumeratorOptions, Position, Solution, SolutionEnumerator};

use rayon::prelude::*;

/// Collect the solutions described by `settings`, up to its solution limit
pub fn solve_all(settings: &Settings) -> Result<Vec<Solution>, QueensError> {
    let enumerator =
        SolutionEnumerator::with_options(settings.board.size, &settings.enumerator_options())?;
    let limit = settings.solver.max_solutions.unwrap_or(usize::MAX);
    enumerator.take(limit).collect()
}

/// Count every solution for an N×N board
pub fn count_solutions(size: usize, options: &EnumeratorOptions) -> Result<usize, QueensError> {
    let mut total = 0;
    for solution in SolutionEnumerator::with_options(size, options)? {
        solution?;
        total += 1;
    }
    Ok(total)
}

/// Count solutions for every board size from 1 to `max_size`, one session per size
pub fn count_up_to(
    max_size: usize,
    options: &EnumeratorOptions,
) -> Result<Vec<(usize, usize)>, QueensError> {
    (1..=max_size)
        .into_par_iter()
        .map(|size| count_solutions(size, options).map(|total| (size, total)))
        .collect()
}

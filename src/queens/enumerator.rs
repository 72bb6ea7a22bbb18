//! Lazy enumeration of every N-Queens solution.
//!
//! Each oracle model is decoded into a solution, expanded by the board
//! reflections, and every derived solution is blocked before it is buffered.
//! The enumerator is single-use: once the oracle reports UNSAT it stays
//! exhausted, and starting over needs a fresh instance.

use super::encoder::QueensEncoder;
use super::symmetry;
use super::validator::SolutionValidator;
use super::{Position, Solution};
use crate::error::QueensError;
use crate::sat::{CheckResult, SatBackend, SatError, SatSolver, SolverOptions};
use log::{debug, info};
use std::fmt;
use std::time::{Duration, Instant};

/// Configuration options for enumeration
#[derive(Debug, Clone)]
pub struct EnumeratorOptions {
    /// Derive reflected solutions from every model
    pub symmetry_expansion: bool,
    /// Per-query time limit handed to the oracle
    pub timeout: Option<Duration>,
}

impl Default for EnumeratorOptions {
    fn default() -> Self {
        Self {
            symmetry_expansion: true,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing buffered; the oracle has to be consulted
    Query,
    /// The last check was SAT and its model has not been consumed yet
    ModelPending,
    /// The oracle reported UNSAT
    Exhausted,
    /// Enumeration stopped on an error
    Failed,
}

/// Statistics about an enumeration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationStatistics {
    pub board_size: usize,
    pub variables: usize,
    /// Gate outputs and other helpers among `variables`
    pub auxiliary_variables: usize,
    pub clauses: usize,
    pub oracle_queries: usize,
    pub solutions_found: usize,
    pub solutions_yielded: usize,
    /// Time spent inside oracle checks
    pub solve_time: Duration,
}

/// Pull-based producer of distinct solutions
pub struct SolutionEnumerator<B: SatBackend = SatSolver> {
    encoder: QueensEncoder<B>,
    validator: SolutionValidator,
    buffer: Vec<Solution>,
    state: State,
    symmetry_expansion: bool,
    oracle_queries: usize,
    solve_time: Duration,
    solutions_found: usize,
    solutions_yielded: usize,
}

impl SolutionEnumerator<SatSolver> {
    /// Enumerate the solutions for an N×N board over a fresh CaDiCaL session
    pub fn new(size: usize) -> Result<Self, QueensError> {
        Self::with_options(size, &EnumeratorOptions::default())
    }

    pub fn with_options(size: usize, options: &EnumeratorOptions) -> Result<Self, QueensError> {
        let solver_options = SolverOptions {
            timeout: options.timeout,
        };
        let encoder = QueensEncoder::with_options(size, &solver_options)?;
        Ok(Self::from_encoder(encoder, options.symmetry_expansion))
    }
}

impl<B: SatBackend> SolutionEnumerator<B> {
    /// Take exclusive ownership of an encoded instance
    pub fn from_encoder(encoder: QueensEncoder<B>, symmetry_expansion: bool) -> Self {
        let validator = SolutionValidator::new(encoder.size());
        Self {
            encoder,
            validator,
            buffer: Vec::new(),
            state: State::Query,
            symmetry_expansion,
            oracle_queries: 0,
            solve_time: Duration::ZERO,
            solutions_found: 0,
            solutions_yielded: 0,
        }
    }

    /// Whether another solution can be produced.
    ///
    /// Consults the oracle only when nothing is buffered. UNSAT is terminal;
    /// an undecided oracle is reported as [`QueensError::Undecided`].
    pub fn has_next(&mut self) -> Result<bool, QueensError> {
        if !self.buffer.is_empty() {
            return Ok(true);
        }
        match self.state {
            State::ModelPending => Ok(true),
            State::Exhausted | State::Failed => Ok(false),
            State::Query => {
                self.oracle_queries += 1;
                let start_time = Instant::now();
                let result = self.encoder.oracle_mut().check();
                self.solve_time += start_time.elapsed();
                match result {
                    CheckResult::Sat => {
                        self.state = State::ModelPending;
                        Ok(true)
                    }
                    CheckResult::Unsat => {
                        info!(
                            "{}-queens exhausted after {} oracle queries, {} solutions",
                            self.encoder.size(),
                            self.oracle_queries,
                            self.solutions_found
                        );
                        self.state = State::Exhausted;
                        Ok(false)
                    }
                    CheckResult::Unknown => {
                        self.state = State::Failed;
                        Err(QueensError::Undecided)
                    }
                }
            }
        }
    }

    /// Read the pending model, block its orbit and refill the buffer
    fn harvest(&mut self) -> Result<(), QueensError> {
        let size = self.encoder.size();
        let values = {
            let model = self.encoder.oracle().model().ok_or(SatError::NoModel)?;
            self.encoder
                .rows()
                .iter()
                .map(|row| model.evaluate(row))
                .collect::<Result<Vec<u64>, _>>()?
        };

        let mut positions = Vec::with_capacity(size);
        for (row, &value) in values.iter().enumerate() {
            if let Some(position) = decode_row(row, value)? {
                positions.push(position);
            }
        }
        let solution = Solution::new(size, positions);

        let derived = if self.symmetry_expansion {
            symmetry::expand(&solution)
        } else {
            vec![solution]
        };

        for candidate in &derived {
            let result = self.validator.validate(candidate);
            if !result.is_valid {
                return Err(QueensError::InvalidSolution {
                    solution: candidate.to_string(),
                    reason: result.to_string(),
                });
            }
            self.block(candidate)?;
        }

        debug!(
            "query {} produced {} solution(s) from {}",
            self.oracle_queries,
            derived.len(),
            derived[0]
        );
        self.solutions_found += derived.len();
        self.buffer.extend(derived);
        self.state = State::Query;
        Ok(())
    }

    /// Forbid the exact row assignment of `solution` from now on
    fn block(&mut self, solution: &Solution) -> Result<(), QueensError> {
        let rows = self.encoder.rows().to_vec();
        let oracle = self.encoder.oracle_mut();
        let mut differs = Vec::with_capacity(rows.len());
        for (row, vector) in rows.iter().enumerate() {
            let pattern = solution.column_of(row).map_or(0, |col| 1u64 << col);
            let same = oracle.eq_const(vector, pattern)?;
            differs.push(oracle.not(same));
        }
        oracle.assert_any(&differs)?;
        Ok(())
    }

    pub fn board_size(&self) -> usize {
        self.encoder.size()
    }

    pub fn statistics(&self) -> EnumerationStatistics {
        EnumerationStatistics {
            board_size: self.encoder.size(),
            variables: self.encoder.oracle().variable_count(),
            auxiliary_variables: self.encoder.variables().auxiliary_count(),
            clauses: self.encoder.oracle().clause_count(),
            oracle_queries: self.oracle_queries,
            solutions_found: self.solutions_found,
            solutions_yielded: self.solutions_yielded,
            solve_time: self.solve_time,
        }
    }
}

/// Decode one row value: zero means no queen, a power of two names the column
pub fn decode_row(row: usize, value: u64) -> Result<Option<Position>, QueensError> {
    match value {
        0 => Ok(None),
        v if v.is_power_of_two() => Ok(Some(Position::new(row, v.trailing_zeros() as usize))),
        v => Err(QueensError::NotOneHot { row, value: v }),
    }
}

impl<B: SatBackend> Iterator for SolutionEnumerator<B> {
    type Item = Result<Solution, QueensError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(solution) = self.buffer.pop() {
            self.solutions_yielded += 1;
            return Some(Ok(solution));
        }

        match self.has_next() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(error) => return Some(Err(error)),
        }

        if let Err(error) = self.harvest() {
            self.state = State::Failed;
            return Some(Err(error));
        }

        let solution = self.buffer.pop()?;
        self.solutions_yielded += 1;
        Some(Ok(solution))
    }
}

impl<B: SatBackend> Drop for SolutionEnumerator<B> {
    fn drop(&mut self) {
        debug!(
            "closing {}-queens enumeration: {} queries, {} of {} solutions yielded",
            self.encoder.size(),
            self.oracle_queries,
            self.solutions_yielded,
            self.solutions_found
        );
    }
}

impl fmt::Display for EnumerationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Enumeration Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.board_size, self.board_size)?;
        writeln!(f, "  Variables: {} ({} auxiliary)", self.variables, self.auxiliary_variables)?;
        writeln!(f, "  Clauses: {}", self.clauses)?;
        writeln!(f, "  Oracle queries: {}", self.oracle_queries)?;
        writeln!(f, "  Solutions found: {}", self.solutions_found)?;
        writeln!(f, "  Solutions yielded: {}", self.solutions_yielded)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

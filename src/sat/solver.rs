//! SAT solver integration using CaDiCaL

use super::constraints::{Clause, Lit};
use super::SatError;
use cadical::{Solver, Timeout};
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Outcome of a satisfiability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Sat,
    Unsat,
    /// The backend gave up before deciding (for instance on timeout)
    Unknown,
}

/// Clause-level capability every oracle backend provides.
///
/// Clauses are monotonic: nothing is ever retracted from a session.
pub trait SatBackend {
    /// Add a single clause to the session
    fn add_clause(&mut self, clause: &Clause) -> Result<(), SatError>;

    /// Decide satisfiability of everything added so far
    fn check(&mut self) -> CheckResult;

    /// Value of `lit` in the last model; `None` if unassigned or no model exists
    fn value(&self, lit: Lit) -> Option<bool>;

    /// Number of clauses added so far
    fn clause_count(&self) -> usize;
}

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    timeout: Option<Duration>,
    last_result: Option<CheckResult>,
    checks: usize,
    solve_time: Duration,
}

/// Configuration options for the SAT solver
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    /// Per-check time limit; an interrupted check reports `Unknown`
    pub timeout: Option<Duration>,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            timeout: None,
            last_result: None,
            checks: 0,
            solve_time: Duration::ZERO,
        }
    }

    /// Create a solver with the given options applied
    pub fn with_options(options: &SolverOptions) -> Self {
        let mut solver = Self::new();
        solver.configure(options);
        solver
    }

    /// Set solving timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Set solver configuration options
    pub fn configure(&mut self, options: &SolverOptions) {
        if let Some(timeout) = options.timeout {
            self.set_timeout(timeout);
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }
}

impl SatBackend for SatSolver {
    fn add_clause(&mut self, clause: &Clause) -> Result<(), SatError> {
        if clause.is_empty() {
            return Err(SatError::EmptyClause);
        }

        self.variable_count = self.variable_count.max(clause.max_variable());
        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
        // A new clause invalidates the previous model.
        self.last_result = None;
        Ok(())
    }

    fn check(&mut self) -> CheckResult {
        if let Some(timeout) = self.timeout {
            // The callback measures from its creation, so install a fresh one per check.
            self.solver.set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
        }

        let start_time = Instant::now();
        let result = match self.solver.solve() {
            Some(true) => CheckResult::Sat,
            Some(false) => CheckResult::Unsat,
            None => CheckResult::Unknown,
        };
        let elapsed = start_time.elapsed();

        self.checks += 1;
        self.solve_time += elapsed;
        self.last_result = Some(result);
        trace!(
            "check #{} over {} clauses: {:?} in {:.3}ms",
            self.checks,
            self.clause_count,
            result,
            elapsed.as_secs_f64() * 1000.0
        );
        result
    }

    fn value(&self, lit: Lit) -> Option<bool> {
        if self.last_result != Some(CheckResult::Sat) {
            return None;
        }
        self.solver.value(lit)
    }

    fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SatSolver {
    fn drop(&mut self) {
        debug!(
            "releasing CaDiCaL session ({} variables, {} clauses, {} checks in {:.3}s)",
            self.variable_count,
            self.clause_count,
            self.checks,
            self.solve_time.as_secs_f64()
        );
    }
}

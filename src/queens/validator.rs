//! Placement rule checks for solutions

use super::Solution;
use itertools::Itertools;
use std::fmt;

/// Validates queen placements against the row, column and diagonal rules
pub struct SolutionValidator {
    size: usize,
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<RuleViolation>,
}

/// Represents a rule violation found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    SizeMismatch { expected: usize, actual: usize },
    WrongQueenCount { expected: usize, actual: usize },
    OutOfBounds { row: usize, col: usize },
    EmptyRow { row: usize },
    SharedRow { row: usize },
    SharedColumn { col: usize },
    SharedDiagonal { first: (usize, usize), second: (usize, usize) },
}

impl SolutionValidator {
    /// Create a validator for an N×N board
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Check every rule and collect all violations
    pub fn validate(&self, solution: &Solution) -> ValidationResult {
        let mut violations = Vec::new();
        let positions = solution.positions();

        if solution.size() != self.size {
            violations.push(RuleViolation::SizeMismatch {
                expected: self.size,
                actual: solution.size(),
            });
        }

        if positions.len() != self.size {
            violations.push(RuleViolation::WrongQueenCount {
                expected: self.size,
                actual: positions.len(),
            });
        }

        for position in positions {
            if position.row >= self.size || position.col >= self.size {
                violations.push(RuleViolation::OutOfBounds {
                    row: position.row,
                    col: position.col,
                });
            }
        }

        for row in 0..self.size {
            if solution.column_of(row).is_none() {
                violations.push(RuleViolation::EmptyRow { row });
            }
        }

        for (a, b) in positions.iter().tuple_combinations() {
            if a.row == b.row {
                violations.push(RuleViolation::SharedRow { row: a.row });
            } else if a.col == b.col {
                violations.push(RuleViolation::SharedColumn { col: a.col });
            } else if a.attacks(b) {
                violations.push(RuleViolation::SharedDiagonal {
                    first: (a.row, a.col),
                    second: (b.row, b.col),
                });
            }
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// Quick check without collecting violations
    pub fn is_valid(&self, solution: &Solution) -> bool {
        self.validate(solution).is_valid
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::SizeMismatch { expected, actual } => {
                write!(f, "board size {} where {} was expected", actual, expected)
            }
            RuleViolation::WrongQueenCount { expected, actual } => {
                write!(f, "{} queens where {} were expected", actual, expected)
            }
            RuleViolation::OutOfBounds { row, col } => write!(f, "({},{}) is off the board", row, col),
            RuleViolation::EmptyRow { row } => write!(f, "row {} has no queen", row),
            RuleViolation::SharedRow { row } => write!(f, "row {} has several queens", row),
            RuleViolation::SharedColumn { col } => write!(f, "column {} has several queens", col),
            RuleViolation::SharedDiagonal { first, second } => write!(
                f,
                "({},{}) and ({},{}) share a diagonal",
                first.0, first.1, second.0, second.1
            ),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            write!(f, "valid")
        } else {
            write!(f, "{}", self.violations.iter().join("; "))
        }
    }
}

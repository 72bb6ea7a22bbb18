//! Clause representation shared by every SAT backend

use itertools::Itertools;
use std::fmt;

/// A DIMACS literal: positive for a variable, negative for its negation
pub type Lit = i32;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Lit>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Lit>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: Lit) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: Lit, lit2: Lit) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Highest variable index mentioned by this clause
    pub fn max_variable(&self) -> usize {
        self.literals
            .iter()
            .map(|lit| lit.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0", self.literals.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_shapes() {
        assert!(Clause::new(vec![]).is_empty());
        assert_eq!(Clause::unit(3).literals, vec![3]);
        assert_eq!(Clause::binary(1, -2).literals, vec![1, -2]);
    }

    #[test]
    fn test_max_variable() {
        assert_eq!(Clause::new(vec![1, -7, 3]).max_variable(), 7);
        assert_eq!(Clause::new(vec![]).max_variable(), 0);
    }

    #[test]
    fn test_dimacs_display() {
        assert_eq!(Clause::new(vec![1, -2, 5]).to_string(), "1 -2 5 0");
    }
}

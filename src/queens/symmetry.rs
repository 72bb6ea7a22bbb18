//! Board reflections used to harvest extra solutions from one model.
//!
//! Only the reflections of rows and columns (and their composition, the 180°
//! rotation) are used; transposes and quarter turns still need their own
//! oracle queries.

use super::{Position, Solution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflection {
    Identity,
    /// Row `r` becomes `N-1-r`
    Rows,
    /// Column `c` becomes `N-1-c`
    Columns,
    /// Both substitutions, i.e. a half turn
    Both,
}

impl Reflection {
    pub const ALL: [Reflection; 4] = [
        Reflection::Identity,
        Reflection::Rows,
        Reflection::Columns,
        Reflection::Both,
    ];

    pub fn apply(self, solution: &Solution) -> Solution {
        let last = solution.size().saturating_sub(1);
        match self {
            Reflection::Identity => solution.clone(),
            Reflection::Rows => solution.map_positions(|p| Position::new(last - p.row, p.col)),
            Reflection::Columns => solution.map_positions(|p| Position::new(p.row, last - p.col)),
            Reflection::Both => {
                solution.map_positions(|p| Position::new(last - p.row, last - p.col))
            }
        }
    }
}

/// The distinct reflections of `solution`, starting with the solution itself
pub fn expand(solution: &Solution) -> Vec<Solution> {
    let mut expanded: Vec<Solution> = Vec::with_capacity(Reflection::ALL.len());
    for reflection in Reflection::ALL {
        let candidate = reflection.apply(solution);
        if !expanded.contains(&candidate) {
            expanded.push(candidate);
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queens::SolutionValidator;

    #[test]
    fn test_four_queens_orbit() {
        let solution = Solution::from_columns(&[1, 3, 0, 2]);
        let expanded = expand(&solution);

        assert_eq!(
            expanded,
            vec![solution.clone(), Solution::from_columns(&[2, 0, 3, 1])]
        );
        assert_eq!(Reflection::Both.apply(&solution), solution);
    }

    #[test]
    fn test_reflections_preserve_validity() {
        let validator = SolutionValidator::new(8);
        let solution = Solution::from_columns(&[0, 4, 7, 5, 2, 6, 1, 3]);
        assert!(validator.is_valid(&solution));

        let expanded = expand(&solution);
        assert_eq!(expanded.len(), 4);
        for reflected in &expanded {
            assert!(validator.is_valid(reflected), "{} is invalid", reflected);
        }
    }

    #[test]
    fn test_single_queen_is_invariant() {
        let solution = Solution::from_columns(&[0]);
        assert_eq!(expand(&solution), vec![solution]);
    }

    #[test]
    fn test_reflections_are_involutions() {
        let solution = Solution::from_columns(&[2, 4, 1, 3, 0]);
        for reflection in Reflection::ALL {
            assert_eq!(reflection.apply(&reflection.apply(&solution)), solution);
        }
    }
}

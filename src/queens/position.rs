//! Queen placements and full board solutions

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A queen at `(row, col)`; ordered by row, then column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether a queen here attacks a queen at `other`
    pub fn attacks(&self, other: &Position) -> bool {
        self.row == other.row
            || self.col == other.col
            || self.row.abs_diff(other.row) == self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A set of queen positions on an N×N board.
///
/// Positions are kept sorted, so two solutions with the same queens compare,
/// hash and print identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Solution {
    size: usize,
    positions: Vec<Position>,
}

impl Solution {
    /// Create a solution from positions in any order
    pub fn new(size: usize, mut positions: Vec<Position>) -> Self {
        positions.sort_unstable();
        Self { size, positions }
    }

    /// Build a solution from `columns[row]`
    pub fn from_columns(columns: &[usize]) -> Self {
        Self::new(
            columns.len(),
            columns
                .iter()
                .enumerate()
                .map(|(row, &col)| Position::new(row, col))
                .collect(),
        )
    }

    /// Board size N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Positions in canonical (sorted) order
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Column of the queen in `row`, if there is one
    pub fn column_of(&self, row: usize) -> Option<usize> {
        self.positions
            .iter()
            .find(|position| position.row == row)
            .map(|position| position.col)
    }

    /// Whether a queen stands on `(row, col)`
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.positions.binary_search(&Position::new(row, col)).is_ok()
    }

    /// Substitute every position through `f`, keeping the board size
    pub fn map_positions<F>(&self, f: F) -> Self
    where
        F: Fn(&Position) -> Position,
    {
        Self::new(self.size, self.positions.iter().map(f).collect())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.positions.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let mut positions = vec![Position::new(1, 0), Position::new(0, 3), Position::new(0, 1)];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 3), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_attacks() {
        let queen = Position::new(2, 2);
        assert!(queen.attacks(&Position::new(2, 5)));
        assert!(queen.attacks(&Position::new(0, 2)));
        assert!(queen.attacks(&Position::new(0, 0)));
        assert!(queen.attacks(&Position::new(4, 0)));
        assert!(!queen.attacks(&Position::new(3, 0)));
    }

    #[test]
    fn test_canonical_form() {
        let a = Solution::new(
            4,
            vec![
                Position::new(3, 2),
                Position::new(0, 1),
                Position::new(2, 0),
                Position::new(1, 3),
            ],
        );
        let b = Solution::from_columns(&[1, 3, 0, 2]);

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{(0,1),(1,3),(2,0),(3,2)}");
        assert_eq!(a.column_of(1), Some(3));
        assert_eq!(a.column_of(4), None);
        assert!(a.contains(2, 0));
        assert!(!a.contains(2, 1));
    }

    #[test]
    fn test_json_shape() {
        let solution = Solution::from_columns(&[0]);
        let json = serde_json::to_string(&solution).unwrap();
        assert_eq!(json, r#"{"size":1,"positions":[{"row":0,"col":0}]}"#);
    }
}

//! Bit-vector encoding of the N-Queens placement rules.
//!
//! Each row is a width-N vector where bit `j` means "queen in column `j`".
//! Rows are only constrained to hold *at most* one queen. Exactly one queen
//! per row and distinct columns both follow from a single population-count
//! equality over the carrying sum of all rows: two queens in one column make
//! the sum carry, and a carry always loses set bits, so the count reaches N
//! only when all N rows are non-empty and pairwise disjoint. Diagonals reuse
//! the same check after shifting row `i` by `i` places on a 2N-wide board.

use crate::error::QueensError;
use crate::sat::{BitVec, BvOracle, SatBackend, SatSolver, SolverOptions, VariableManager};
use log::debug;

/// Largest board whose rows still evaluate into a `u64`.
///
/// This is a representation limit, not a practical one: the population-count
/// constraints give CaDiCaL a hard time well before this size, and finding
/// even a first solution near 64 can take many minutes.
pub const MAX_BOARD_SIZE: usize = 64;

/// Owns the oracle session and the row variables of one N-Queens instance
pub struct QueensEncoder<B: SatBackend = SatSolver> {
    oracle: BvOracle<B>,
    rows: Vec<BitVec>,
    size: usize,
}

/// Reject board sizes the encoding cannot represent
pub fn check_board_size(size: usize) -> Result<(), QueensError> {
    if size == 0 {
        return Err(QueensError::InvalidConfiguration(
            "board size must be at least 1".to_string(),
        ));
    }
    if size > MAX_BOARD_SIZE {
        return Err(QueensError::InvalidConfiguration(format!(
            "board size {} exceeds the maximum of {}",
            size, MAX_BOARD_SIZE
        )));
    }
    Ok(())
}

impl QueensEncoder<SatSolver> {
    /// Encode an N-Queens instance over a fresh CaDiCaL session
    pub fn new(size: usize) -> Result<Self, QueensError> {
        Self::with_options(size, &SolverOptions::default())
    }

    pub fn with_options(size: usize, options: &SolverOptions) -> Result<Self, QueensError> {
        Self::with_backend(size, SatSolver::with_options(options))
    }
}

impl<B: SatBackend> QueensEncoder<B> {
    /// Encode an N-Queens instance over the given backend session
    pub fn with_backend(size: usize, backend: B) -> Result<Self, QueensError> {
        check_board_size(size)?;

        let mut oracle = BvOracle::with_backend(backend)?;
        let rows = Self::create_row_variables(&mut oracle, size);
        let mut encoder = Self { oracle, rows, size };

        for row in encoder.rows.clone() {
            encoder.assert_row_exclusivity(&row)?;
        }
        let rows = encoder.rows.clone();
        encoder.assert_column_exclusivity(&rows)?;
        encoder.assert_diagonal_exclusivity(&rows)?;

        debug!(
            "encoded {}-queens with {} variables and {} clauses",
            size,
            encoder.oracle.variable_count(),
            encoder.oracle.clause_count()
        );
        Ok(encoder)
    }

    /// N distinct row variables of width N, named `row0`, `row1`, ...
    pub fn create_row_variables(oracle: &mut BvOracle<B>, size: usize) -> Vec<BitVec> {
        (0..size)
            .map(|i| oracle.create_variable(&format!("row{}", i), size))
            .collect()
    }

    /// `row == 0 OR (row AND (row - 1)) == 0`: at most one queen in the row
    pub fn assert_row_exclusivity(&mut self, row: &BitVec) -> Result<(), QueensError> {
        let oracle = &mut self.oracle;
        let one = oracle.constant(row.width(), 1);
        let predecessor = oracle.sub(row, &one)?;
        let lowest_cleared = oracle.bv_and(row, &predecessor)?;

        let empty = oracle.is_zero(row)?;
        let single = oracle.is_zero(&lowest_cleared)?;
        let at_most_one = oracle.or(empty, single)?;
        oracle.assert(at_most_one)?;
        Ok(())
    }

    /// The carrying sum of `vectors` has exactly N bits set
    pub fn assert_column_exclusivity(&mut self, vectors: &[BitVec]) -> Result<(), QueensError> {
        let oracle = &mut self.oracle;
        let mut sum = match vectors.first() {
            Some(first) => first.clone(),
            None => return Ok(()),
        };
        for vector in &vectors[1..] {
            sum = oracle.add(&sum, vector)?;
        }

        let count = oracle.popcount(&sum)?;
        let all_placed = oracle.eq_const(&count, self.size as u64)?;
        oracle.assert(all_placed)?;
        Ok(())
    }

    /// Shift row `i` by `i` places on a 2N-wide board so each diagonal lands in one column
    pub fn assert_diagonal_exclusivity(&mut self, rows: &[BitVec]) -> Result<(), QueensError> {
        let size = self.size;

        // Shifting left by the row index lines up cells with equal `row + col`.
        let by_sum: Vec<BitVec> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let widened = self.oracle.zero_extend(row, size);
                self.oracle.shl(&widened, i)
            })
            .collect();

        // Shifting right lines up equal `col - row`; rows start in the upper
        // half so no queen is shifted out.
        let padding = self.oracle.constant(size, 0);
        let by_difference: Vec<BitVec> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let raised = self.oracle.concat(row, &padding);
                self.oracle.lshr(&raised, i)
            })
            .collect();

        self.assert_column_exclusivity(&by_sum)?;
        self.assert_column_exclusivity(&by_difference)?;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[BitVec] {
        &self.rows
    }

    pub fn oracle(&self) -> &BvOracle<B> {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut BvOracle<B> {
        &mut self.oracle
    }

    pub fn variables(&self) -> &VariableManager {
        self.oracle.variables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::CheckResult;

    #[test]
    fn test_rejects_unsupported_sizes() {
        assert!(matches!(
            QueensEncoder::new(0),
            Err(QueensError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            QueensEncoder::new(MAX_BOARD_SIZE + 1),
            Err(QueensError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_row_variables() {
        let encoder = QueensEncoder::new(5).unwrap();
        assert_eq!(encoder.rows().len(), 5);
        assert!(encoder.rows().iter().all(|row| row.width() == 5));
        assert_eq!(encoder.variables().vectors().len(), 5);
        assert!(encoder.variables().vector_bit("row4", 4).is_some());
    }

    #[test]
    fn test_small_boards_satisfiability() {
        for (size, expected) in [
            (1, CheckResult::Sat),
            (2, CheckResult::Unsat),
            (3, CheckResult::Unsat),
            (4, CheckResult::Sat),
            (5, CheckResult::Sat),
        ] {
            let mut encoder = QueensEncoder::new(size).unwrap();
            assert_eq!(encoder.oracle_mut().check(), expected, "n = {}", size);
        }
    }

    #[test]
    fn test_model_rows_are_one_hot() {
        let mut encoder = QueensEncoder::new(6).unwrap();
        assert_eq!(encoder.oracle_mut().check(), CheckResult::Sat);

        let model = encoder.oracle().model().unwrap();
        let values: Vec<u64> = encoder
            .rows()
            .iter()
            .map(|row| model.evaluate(row).unwrap())
            .collect();

        assert!(values.iter().all(|value| value.count_ones() == 1));
        let union = values.iter().fold(0u64, |acc, value| acc | value);
        assert_eq!(union, 0b11_1111);
    }

    #[test]
    fn test_fixed_attacking_rows_are_rejected() {
        // Queens at (0,0) and (1,1) share a diagonal.
        let mut encoder = QueensEncoder::new(4).unwrap();
        let rows = encoder.rows().to_vec();
        let oracle = encoder.oracle_mut();
        let first = oracle.eq_const(&rows[0], 0b0001).unwrap();
        let second = oracle.eq_const(&rows[1], 0b0010).unwrap();
        oracle.assert(first).unwrap();
        oracle.assert(second).unwrap();
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }

    #[test]
    fn test_fixed_anti_diagonal_is_rejected() {
        // Queens at (0,3) and (1,2) share the other diagonal direction.
        let mut encoder = QueensEncoder::new(5).unwrap();
        let rows = encoder.rows().to_vec();
        let oracle = encoder.oracle_mut();
        let first = oracle.eq_const(&rows[0], 0b01000).unwrap();
        let second = oracle.eq_const(&rows[1], 0b00100).unwrap();
        oracle.assert(first).unwrap();
        oracle.assert(second).unwrap();
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }
}

//! Fixed-width bit-vector expressions, bit-blasted onto a [`SatBackend`].
//!
//! Every gate gets a fresh output variable defined by its Tseitin clauses.
//! Vectors are stored least significant bit first. A single variable fixed to
//! true by a unit clause provides the constants, and gates fold constant
//! operands away before anything is emitted, so shifts and zero-extension
//! cost nothing.

use super::constraints::{Clause, Lit};
use super::solver::{CheckResult, SatBackend, SatSolver};
use super::variables::VariableManager;
use super::SatError;
use log::trace;

/// A symbolic bit-vector: one literal per bit, least significant first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<Lit>,
}

impl BitVec {
    fn from_bits(bits: Vec<Lit>) -> Self {
        Self { bits }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn bits(&self) -> &[Lit] {
        &self.bits
    }
}

/// Bit-vector satisfiability oracle over one backend session
pub struct BvOracle<B: SatBackend = SatSolver> {
    backend: B,
    variables: VariableManager,
    true_lit: Lit,
    last_check: Option<CheckResult>,
}

impl BvOracle<SatSolver> {
    /// Create an oracle over a fresh CaDiCaL session
    pub fn new() -> Result<Self, SatError> {
        Self::with_backend(SatSolver::new())
    }
}

impl<B: SatBackend> BvOracle<B> {
    /// Create an oracle over the given backend session
    pub fn with_backend(backend: B) -> Result<Self, SatError> {
        let mut variables = VariableManager::new();
        let true_lit = variables.auxiliary();
        let mut oracle = Self {
            backend,
            variables,
            true_lit,
            last_check: None,
        };
        oracle.emit(vec![true_lit])?;
        Ok(oracle)
    }

    pub fn true_lit(&self) -> Lit {
        self.true_lit
    }

    pub fn false_lit(&self) -> Lit {
        -self.true_lit
    }

    pub fn variables(&self) -> &VariableManager {
        &self.variables
    }

    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    pub fn clause_count(&self) -> usize {
        self.backend.clause_count()
    }

    fn emit(&mut self, literals: Vec<Lit>) -> Result<(), SatError> {
        self.last_check = None;
        self.backend.add_clause(&Clause::new(literals))
    }

    fn constant_value(&self, lit: Lit) -> Option<bool> {
        if lit == self.true_lit {
            Some(true)
        } else if lit == -self.true_lit {
            Some(false)
        } else {
            None
        }
    }

    fn constant_lit(&self, value: bool) -> Lit {
        if value {
            self.true_lit
        } else {
            -self.true_lit
        }
    }

    fn check_widths(a: &BitVec, b: &BitVec) -> Result<(), SatError> {
        if a.width() != b.width() {
            return Err(SatError::WidthMismatch {
                left: a.width(),
                right: b.width(),
            });
        }
        Ok(())
    }

    // ---- Boolean layer -------------------------------------------------

    pub fn not(&self, a: Lit) -> Lit {
        -a
    }

    pub fn and(&mut self, a: Lit, b: Lit) -> Result<Lit, SatError> {
        match (self.constant_value(a), self.constant_value(b)) {
            (Some(false), _) | (_, Some(false)) => return Ok(self.false_lit()),
            (Some(true), _) => return Ok(b),
            (_, Some(true)) => return Ok(a),
            _ => {}
        }
        if a == b {
            return Ok(a);
        }
        if a == -b {
            return Ok(self.false_lit());
        }

        let g = self.variables.auxiliary();
        self.emit(vec![-g, a])?;
        self.emit(vec![-g, b])?;
        self.emit(vec![g, -a, -b])?;
        Ok(g)
    }

    pub fn or(&mut self, a: Lit, b: Lit) -> Result<Lit, SatError> {
        let nor = self.and(-a, -b)?;
        Ok(-nor)
    }

    pub fn xor(&mut self, a: Lit, b: Lit) -> Result<Lit, SatError> {
        match (self.constant_value(a), self.constant_value(b)) {
            (Some(x), Some(y)) => return Ok(self.constant_lit(x != y)),
            (Some(false), _) => return Ok(b),
            (Some(true), _) => return Ok(-b),
            (_, Some(false)) => return Ok(a),
            (_, Some(true)) => return Ok(-a),
            _ => {}
        }
        if a == b {
            return Ok(self.false_lit());
        }
        if a == -b {
            return Ok(self.true_lit);
        }

        let g = self.variables.auxiliary();
        self.emit(vec![-g, a, b])?;
        self.emit(vec![-g, -a, -b])?;
        self.emit(vec![g, -a, b])?;
        self.emit(vec![g, a, -b])?;
        Ok(g)
    }

    /// Conjunction of any number of literals; true when `lits` is empty
    pub fn and_all(&mut self, lits: &[Lit]) -> Result<Lit, SatError> {
        let mut operands: Vec<Lit> = Vec::with_capacity(lits.len());
        for &lit in lits {
            match self.constant_value(lit) {
                Some(true) => continue,
                Some(false) => return Ok(self.false_lit()),
                None => {}
            }
            if operands.contains(&-lit) {
                return Ok(self.false_lit());
            }
            if !operands.contains(&lit) {
                operands.push(lit);
            }
        }

        match operands.as_slice() {
            [] => Ok(self.true_lit),
            [single] => Ok(*single),
            _ => {
                let g = self.variables.auxiliary();
                for &lit in &operands {
                    self.emit(vec![-g, lit])?;
                }
                let mut defining = vec![g];
                defining.extend(operands.iter().map(|&lit| -lit));
                self.emit(defining)?;
                Ok(g)
            }
        }
    }

    /// Disjunction of any number of literals; false when `lits` is empty
    pub fn or_all(&mut self, lits: &[Lit]) -> Result<Lit, SatError> {
        let negated: Vec<Lit> = lits.iter().map(|&lit| -lit).collect();
        let none = self.and_all(&negated)?;
        Ok(-none)
    }

    // ---- Bit-vector layer ----------------------------------------------

    /// Create a fresh symbolic variable of the given width
    pub fn create_variable(&mut self, name: &str, width: usize) -> BitVec {
        BitVec::from_bits(self.variables.vector(name, width))
    }

    /// Constant vector; bits above 64 are zero
    pub fn constant(&self, width: usize, value: u64) -> BitVec {
        BitVec::from_bits(
            (0..width)
                .map(|i| self.constant_lit(i < 64 && (value >> i) & 1 == 1))
                .collect(),
        )
    }

    pub fn extract(&self, a: &BitVec, bit: usize) -> Result<Lit, SatError> {
        a.bits.get(bit).copied().ok_or(SatError::BitOutOfRange {
            bit,
            width: a.width(),
        })
    }

    pub fn bv_not(&self, a: &BitVec) -> BitVec {
        BitVec::from_bits(a.bits.iter().map(|&bit| -bit).collect())
    }

    pub fn bv_and(&mut self, a: &BitVec, b: &BitVec) -> Result<BitVec, SatError> {
        Self::check_widths(a, b)?;
        let bits = a
            .bits
            .iter()
            .zip(&b.bits)
            .map(|(&x, &y)| self.and(x, y))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BitVec::from_bits(bits))
    }

    pub fn bv_or(&mut self, a: &BitVec, b: &BitVec) -> Result<BitVec, SatError> {
        Self::check_widths(a, b)?;
        let bits = a
            .bits
            .iter()
            .zip(&b.bits)
            .map(|(&x, &y)| self.or(x, y))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BitVec::from_bits(bits))
    }

    fn full_adder(&mut self, a: Lit, b: Lit, carry: Lit) -> Result<(Lit, Lit), SatError> {
        let half = self.xor(a, b)?;
        let sum = self.xor(half, carry)?;
        let generate = self.and(a, b)?;
        let propagate = self.and(half, carry)?;
        let carry_out = self.or(generate, propagate)?;
        Ok((sum, carry_out))
    }

    fn add_with_carry(&mut self, a: &BitVec, b: &BitVec, carry_in: Lit) -> Result<BitVec, SatError> {
        Self::check_widths(a, b)?;
        let mut carry = carry_in;
        let mut bits = Vec::with_capacity(a.width());
        for (i, (&x, &y)) in a.bits.iter().zip(&b.bits).enumerate() {
            if i + 1 == a.width() {
                // The final carry falls off the top; only the sum bit is needed.
                let half = self.xor(x, y)?;
                bits.push(self.xor(half, carry)?);
            } else {
                let (sum, carry_out) = self.full_adder(x, y, carry)?;
                bits.push(sum);
                carry = carry_out;
            }
        }
        Ok(BitVec::from_bits(bits))
    }

    /// Modular addition (ripple carry)
    pub fn add(&mut self, a: &BitVec, b: &BitVec) -> Result<BitVec, SatError> {
        let carry_in = self.false_lit();
        self.add_with_carry(a, b, carry_in)
    }

    /// Modular subtraction, computed as `a + !b + 1`
    pub fn sub(&mut self, a: &BitVec, b: &BitVec) -> Result<BitVec, SatError> {
        let inverted = self.bv_not(b);
        let carry_in = self.true_lit;
        self.add_with_carry(a, &inverted, carry_in)
    }

    pub fn eq(&mut self, a: &BitVec, b: &BitVec) -> Result<Lit, SatError> {
        Self::check_widths(a, b)?;
        let mut same = Vec::with_capacity(a.width());
        for (&x, &y) in a.bits.iter().zip(&b.bits) {
            same.push(-self.xor(x, y)?);
        }
        self.and_all(&same)
    }

    pub fn eq_const(&mut self, a: &BitVec, value: u64) -> Result<Lit, SatError> {
        if a.width() < 64 && value >> a.width() != 0 {
            return Ok(self.false_lit());
        }
        let expected = self.constant(a.width(), value);
        self.eq(a, &expected)
    }

    pub fn is_zero(&mut self, a: &BitVec) -> Result<Lit, SatError> {
        self.eq_const(a, 0)
    }

    /// Logical shift left by a constant amount, keeping the width
    pub fn shl(&self, a: &BitVec, amount: usize) -> BitVec {
        let zero = self.false_lit();
        BitVec::from_bits(
            (0..a.width())
                .map(|i| if i < amount { zero } else { a.bits[i - amount] })
                .collect(),
        )
    }

    /// Logical shift right by a constant amount, keeping the width
    pub fn lshr(&self, a: &BitVec, amount: usize) -> BitVec {
        let zero = self.false_lit();
        BitVec::from_bits(
            (0..a.width())
                .map(|i| a.bits.get(i + amount).copied().unwrap_or(zero))
                .collect(),
        )
    }

    pub fn zero_extend(&self, a: &BitVec, extra: usize) -> BitVec {
        let mut bits = a.bits.clone();
        bits.resize(a.width() + extra, self.false_lit());
        BitVec::from_bits(bits)
    }

    /// `high` occupies the upper bits of the result, `low` the lower ones
    pub fn concat(&self, high: &BitVec, low: &BitVec) -> BitVec {
        let mut bits = low.bits.clone();
        bits.extend_from_slice(&high.bits);
        BitVec::from_bits(bits)
    }

    /// Integer number of set bits, as a vector just wide enough to hold `a.width()`
    pub fn popcount(&mut self, a: &BitVec) -> Result<BitVec, SatError> {
        let width = counter_width(a.width());
        let mut count = self.constant(width, 0);
        for &bit in &a.bits {
            let addend = self.zero_extend(&BitVec::from_bits(vec![bit]), width - 1);
            count = self.add(&count, &addend)?;
        }
        Ok(count)
    }

    // ---- Session -------------------------------------------------------

    /// Assert a Boolean expression; assertions are never retracted
    pub fn assert(&mut self, lit: Lit) -> Result<(), SatError> {
        self.emit(vec![lit])
    }

    /// Assert that at least one of `lits` holds, as a single clause
    pub fn assert_any(&mut self, lits: &[Lit]) -> Result<(), SatError> {
        if lits.is_empty() {
            return Err(SatError::EmptyClause);
        }
        self.emit(lits.to_vec())
    }

    pub fn check(&mut self) -> CheckResult {
        let result = self.backend.check();
        trace!(
            "oracle check over {} variables and {} clauses: {:?}",
            self.variable_count(),
            self.clause_count(),
            result
        );
        self.last_check = Some(result);
        result
    }

    /// The model of the last check, if it was satisfiable and nothing was asserted since
    pub fn model(&self) -> Option<Model<'_, B>> {
        match self.last_check {
            Some(CheckResult::Sat) => Some(Model { oracle: self }),
            _ => None,
        }
    }
}

/// Number of bits needed to represent every count from 0 to `width`
fn counter_width(width: usize) -> usize {
    ((usize::BITS - width.leading_zeros()) as usize).max(1)
}

/// A satisfying assignment, borrowed from the oracle that produced it
pub struct Model<'a, B: SatBackend> {
    oracle: &'a BvOracle<B>,
}

impl<B: SatBackend> Model<'_, B> {
    /// Value of a single literal; unassigned variables read as false
    pub fn evaluate_lit(&self, lit: Lit) -> bool {
        self.oracle
            .constant_value(lit)
            .or_else(|| self.oracle.backend.value(lit))
            .unwrap_or(false)
    }

    /// Concrete value of a vector of at most 64 bits
    pub fn evaluate(&self, vector: &BitVec) -> Result<u64, SatError> {
        if vector.width() > 64 {
            return Err(SatError::ValueTooWide {
                width: vector.width(),
            });
        }
        Ok(vector
            .bits
            .iter()
            .enumerate()
            .filter(|&(_, &bit)| self.evaluate_lit(bit))
            .fold(0u64, |value, (i, _)| value | (1 << i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> BvOracle {
        BvOracle::new().unwrap()
    }

    /// Enumerate every value of `x` allowed by the current assertions
    fn all_values(oracle: &mut BvOracle, x: &BitVec) -> Vec<u64> {
        let mut values = Vec::new();
        while oracle.check() == CheckResult::Sat {
            let value = oracle.model().unwrap().evaluate(x).unwrap();
            values.push(value);
            let same = oracle.eq_const(x, value).unwrap();
            oracle.assert(-same).unwrap();
        }
        values.sort_unstable();
        values
    }

    #[test]
    fn test_constant_folding() {
        let mut oracle = oracle();
        let t = oracle.true_lit();
        let f = oracle.false_lit();
        let x = oracle.create_variable("x", 1).bits()[0];
        let clauses = oracle.clause_count();

        assert_eq!(oracle.and(t, x).unwrap(), x);
        assert_eq!(oracle.and(f, x).unwrap(), f);
        assert_eq!(oracle.or(t, x).unwrap(), t);
        assert_eq!(oracle.xor(x, x).unwrap(), f);
        assert_eq!(oracle.xor(t, x).unwrap(), -x);
        assert_eq!(oracle.and_all(&[]).unwrap(), t);
        assert_eq!(oracle.or_all(&[]).unwrap(), f);
        assert_eq!(oracle.clause_count(), clauses);
    }

    #[test]
    fn test_addition_wraps_around() {
        let mut oracle = oracle();
        let x = oracle.create_variable("x", 4);
        let three = oracle.constant(4, 3);
        let sum = oracle.add(&x, &three).unwrap();
        let wrapped = oracle.eq_const(&sum, 1).unwrap();
        oracle.assert(wrapped).unwrap();

        assert_eq!(all_values(&mut oracle, &x), vec![14]);
    }

    #[test]
    fn test_subtraction() {
        let mut oracle = oracle();
        let x = oracle.create_variable("x", 4);
        let five = oracle.constant(4, 5);
        let difference = oracle.sub(&x, &five).unwrap();
        let is_two = oracle.eq_const(&difference, 2).unwrap();
        oracle.assert(is_two).unwrap();
        assert_eq!(all_values(&mut oracle, &x), vec![7]);
    }

    #[test]
    fn test_constant_subtraction_borrows() {
        let mut oracle = oracle();
        let clauses = oracle.clause_count();
        let two = oracle.constant(4, 2);
        let five = oracle.constant(4, 5);
        let difference = oracle.sub(&two, &five).unwrap();

        // Constant operands fold completely.
        assert_eq!(oracle.clause_count(), clauses);
        assert_eq!(oracle.check(), CheckResult::Sat);
        assert_eq!(oracle.model().unwrap().evaluate(&difference).unwrap(), 13);
    }

    #[test]
    fn test_popcount_counts_set_bits() {
        let mut oracle = oracle();
        let x = oracle.create_variable("x", 5);
        let count = oracle.popcount(&x).unwrap();
        assert_eq!(count.width(), 3);

        let two_bits = oracle.eq_const(&count, 2).unwrap();
        oracle.assert(two_bits).unwrap();

        let values = all_values(&mut oracle, &x);
        assert_eq!(values.len(), 10);
        assert!(values.iter().all(|value| value.count_ones() == 2));
    }

    #[test]
    fn test_at_most_one_bit_trick() {
        let mut oracle = oracle();
        let x = oracle.create_variable("x", 4);
        let one = oracle.constant(4, 1);
        let below = oracle.sub(&x, &one).unwrap();
        let masked = oracle.bv_and(&x, &below).unwrap();
        let empty = oracle.is_zero(&x).unwrap();
        let single = oracle.is_zero(&masked).unwrap();
        let at_most_one = oracle.or(empty, single).unwrap();
        oracle.assert(at_most_one).unwrap();

        assert_eq!(all_values(&mut oracle, &x), vec![0, 1, 2, 4, 8]);
    }

    #[test]
    fn test_shifts_and_concatenation() {
        let mut oracle = oracle();
        let value = oracle.constant(4, 0b1011);
        let wide = oracle.zero_extend(&value, 4);
        let left = oracle.shl(&wide, 3);
        let right = oracle.lshr(&value, 2);
        let high = oracle.constant(2, 0b10);
        let joined = oracle.concat(&high, &value);
        let mask = oracle.constant(4, 0b0100);
        let merged = oracle.bv_or(&value, &mask).unwrap();

        assert_eq!(oracle.check(), CheckResult::Sat);
        let model = oracle.model().unwrap();
        assert_eq!(wide.width(), 8);
        assert_eq!(model.evaluate(&left).unwrap(), 0b0101_1000);
        assert_eq!(model.evaluate(&right).unwrap(), 0b10);
        assert_eq!(model.evaluate(&joined).unwrap(), 0b10_1011);
        assert_eq!(model.evaluate(&merged).unwrap(), 0b1111);
        assert!(model.evaluate_lit(oracle.extract(&value, 3).unwrap()));
    }

    #[test]
    fn test_width_errors() {
        let mut oracle = oracle();
        let a = oracle.create_variable("a", 3);
        let b = oracle.create_variable("b", 4);

        assert_eq!(
            oracle.add(&a, &b),
            Err(SatError::WidthMismatch { left: 3, right: 4 })
        );
        assert_eq!(
            oracle.extract(&a, 3),
            Err(SatError::BitOutOfRange { bit: 3, width: 3 })
        );

        let wide = oracle.create_variable("wide", 65);
        assert_eq!(oracle.check(), CheckResult::Sat);
        assert_eq!(
            oracle.model().unwrap().evaluate(&wide),
            Err(SatError::ValueTooWide { width: 65 })
        );
    }

    #[test]
    fn test_model_requires_satisfiable_check() {
        let mut oracle = oracle();
        let x = oracle.create_variable("x", 2);
        assert!(oracle.model().is_none());

        assert_eq!(oracle.check(), CheckResult::Sat);
        assert!(oracle.model().is_some());

        let impossible = oracle.eq_const(&x, 4).unwrap();
        assert_eq!(impossible, oracle.false_lit());
        oracle.assert(impossible).unwrap();
        assert!(oracle.model().is_none());
        assert_eq!(oracle.check(), CheckResult::Unsat);
        assert!(oracle.model().is_none());
    }
}

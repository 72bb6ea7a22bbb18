//! Variable management for the bit-vector encoding

use super::constraints::Lit;
use std::collections::HashMap;

/// Types of variables handed out by the manager
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Bit `bit` of the named bit-vector `name`
    VectorBit { name: String, bit: usize },
    /// Gate outputs and other encoding helpers
    Auxiliary,
}

/// Allocates SAT variable IDs and remembers which named vector bits they stand for
#[derive(Debug)]
pub struct VariableManager {
    /// Map from named vector bit to SAT variable ID (positive integer)
    variable_map: HashMap<VariableType, Lit>,
    /// Widths of the named vectors, in creation order
    vectors: Vec<(String, usize)>,
    /// Next available variable ID
    next_id: Lit,
    auxiliary_count: usize,
}

impl VariableManager {
    /// Create a new variable manager
    pub fn new() -> Self {
        Self {
            variable_map: HashMap::new(),
            vectors: Vec::new(),
            next_id: 1, // SAT variables start from 1
            auxiliary_count: 0,
        }
    }

    fn allocate(&mut self) -> Lit {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate a fresh helper variable
    pub fn auxiliary(&mut self) -> Lit {
        self.auxiliary_count += 1;
        self.allocate()
    }

    /// Allocate `width` variables for a new named vector, least significant bit first.
    ///
    /// Names are not required to be unique; a repeated name shadows the earlier
    /// vector in [`VariableManager::vector_bit`] lookups.
    pub fn vector(&mut self, name: &str, width: usize) -> Vec<Lit> {
        self.vectors.push((name.to_string(), width));
        (0..width)
            .map(|bit| {
                let id = self.allocate();
                self.variable_map.insert(
                    VariableType::VectorBit { name: name.to_string(), bit },
                    id,
                );
                id
            })
            .collect()
    }

    /// Look up the variable of a named vector bit
    pub fn vector_bit(&self, name: &str, bit: usize) -> Option<Lit> {
        self.variable_map
            .get(&VariableType::VectorBit { name: name.to_string(), bit })
            .copied()
    }

    /// Names and widths of all vectors created so far
    pub fn vectors(&self) -> &[(String, usize)] {
        &self.vectors
    }

    /// Get total number of variables
    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    /// Number of helper variables among them
    pub fn auxiliary_count(&self) -> usize {
        self.auxiliary_count
    }
}

impl Default for VariableManager {
    fn default() -> Self {
        Self::new()
    }
}

//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct holding the committed machine state. It provides:
//! 1. **Storage:** One 32-bit value per architectural register.
//! 2. **Validity:** A bit per register recording whether a committed instruction has written it.
//! 3. **Observability:** Iteration over values and validity bits for end-of-run dumps.

/// Committed architectural register file.
///
/// Only the retire stage writes here. Every register starts at zero and
/// invalid; the first commit to a register marks it valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    values: Vec<i32>,
    valid: Vec<bool>,
}

impl RegisterFile {
    /// Creates a register file with `count` registers, all zero and invalid.
    pub fn new(count: usize) -> Self {
        Self {
            values: vec![0; count],
            valid: vec![false; count],
        }
    }

    /// Number of architectural registers.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the file holds no registers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if `idx` names a register in this file.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx < self.values.len()
    }

    /// Reads the committed value of register `idx`.
    ///
    /// Out-of-range indices read as zero; decode rejects them before they reach here.
    #[inline]
    pub fn read(&self, idx: usize) -> i32 {
        self.values.get(idx).copied().unwrap_or(0)
    }

    /// Returns the validity bit of register `idx`.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        self.valid.get(idx).copied().unwrap_or(false)
    }

    /// Commits `val` to register `idx` and marks it valid.
    pub fn write(&mut self, idx: usize, val: i32) {
        if let (Some(slot), Some(valid)) = (self.values.get_mut(idx), self.valid.get_mut(idx)) {
            *slot = val;
            *valid = true;
        }
    }

    /// Iterates `(value, valid)` pairs in register order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, bool)> + '_ {
        self.values.iter().copied().zip(self.valid.iter().copied())
    }
}

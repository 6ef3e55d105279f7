//! Data Memory.
//!
//! Flat, word-addressed store of 32-bit values. Addresses are word indices;
//! every access is bounds-checked and an out-of-range address is reported
//! with the program counter of the instruction that issued it.

use crate::common::error::{SimError, SimResult};

/// Word-addressable data memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMemory {
    words: Vec<i32>,
}

impl DataMemory {
    /// Creates a zero-filled memory of `words` words.
    pub fn new(words: usize) -> Self {
        Self {
            words: vec![0; words],
        }
    }

    /// Number of addressable words.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the memory has no words.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn index(&self, pc: u32, address: i32) -> SimResult<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.words.len())
            .ok_or(SimError::Address { pc, address })
    }

    /// Reads the word at `address`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Address` when `address` is outside memory.
    pub fn read(&self, pc: u32, address: i32) -> SimResult<i32> {
        let i = self.index(pc, address)?;
        Ok(self.words[i])
    }

    /// Writes `value` to the word at `address`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Address` when `address` is outside memory.
    pub fn write(&mut self, pc: u32, address: i32, value: i32) -> SimResult<()> {
        let i = self.index(pc, address)?;
        self.words[i] = value;
        Ok(())
    }

    /// All words in address order.
    pub fn words(&self) -> &[i32] {
        &self.words
    }
}

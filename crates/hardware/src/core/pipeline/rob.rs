//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer that tracks in-flight instructions from rename
//! through retire. It provides:
//! 1. **Allocation:** Assigns unique, monotonically increasing tags to instructions leaving Decode.
//! 2. **Completion:** Marks instructions as done when their functional unit finishes.
//! 3. **In-order Commit:** Retires instructions from the head in program order.
//! 4. **Flag Versioning:** Holds the zero flag produced by each flag-setting instruction.

use serde::Serialize;

use crate::common::error::{Resource, SimError, SimResult};
use crate::core::pipeline::prf::PhysReg;
use crate::isa::instruction::Opcode;

/// Unique tag identifying an in-flight instruction in the ROB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct RobTag(pub u32);

/// Lifecycle state of an ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum RobState {
    /// Entry allocated but instruction not yet finished executing.
    #[default]
    Issued,
    /// Execution complete, waiting to commit.
    Completed,
}

/// A single entry in the Reorder Buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RobEntry {
    /// Unique tag for this entry.
    pub tag: RobTag,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Operation.
    pub opcode: Option<Opcode>,
    /// Destination architectural register.
    pub rd: Option<usize>,
    /// Physical register holding the result.
    pub dest: Option<PhysReg>,
    /// Mapping of `rd` that this instruction superseded at rename.
    pub prev_dest: Option<PhysReg>,
    /// Whether the instruction produces a zero flag.
    pub sets_flag: bool,
    /// Zero flag produced by the instruction, once known.
    pub zero: Option<bool>,
    /// Current lifecycle state.
    pub state: RobState,
    /// Whether this entry is valid (occupied).
    pub valid: bool,
}

/// Fields recorded when an instruction enters the ROB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobAlloc {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Operation.
    pub opcode: Opcode,
    /// Destination architectural register.
    pub rd: Option<usize>,
    /// Physical register holding the result.
    pub dest: Option<PhysReg>,
    /// Mapping of `rd` superseded at rename.
    pub prev_dest: Option<PhysReg>,
}

/// Circular buffer enforcing in-order commit.
#[derive(Clone, Debug)]
pub struct Rob {
    /// Fixed-size entry array.
    entries: Vec<RobEntry>,
    /// Index of the oldest entry (commit point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of valid entries.
    count: usize,
    /// Monotonically increasing tag counter.
    next_tag: u32,
}

impl Rob {
    /// Creates a new ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, RobEntry::default);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
            next_tag: 1,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ROB is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.entries.len() - self.count
    }

    /// Appends a new entry at the tail.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ResourceExhausted` when every slot is occupied.
    pub fn allocate(&mut self, alloc: RobAlloc) -> SimResult<RobTag> {
        if self.is_full() {
            return Err(SimError::ResourceExhausted {
                resource: Resource::Rob,
            });
        }

        let tag = RobTag(self.next_tag);
        self.next_tag = self.next_tag.wrapping_add(1);
        if self.next_tag == 0 {
            self.next_tag = 1; // skip 0
        }

        self.entries[self.tail] = RobEntry {
            tag,
            pc: alloc.pc,
            opcode: Some(alloc.opcode),
            rd: alloc.rd,
            dest: alloc.dest,
            prev_dest: alloc.prev_dest,
            sets_flag: alloc.opcode.sets_zero_flag(),
            zero: None,
            state: RobState::Issued,
            valid: true,
        };

        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Ok(tag)
    }

    /// Marks an entry as Completed.
    pub fn complete(&mut self, tag: RobTag) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.state = RobState::Completed;
        }
    }

    /// Records the zero flag produced by an entry.
    pub fn set_zero(&mut self, tag: RobTag, zero: bool) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.zero = Some(zero);
        }
    }

    /// Returns a reference to the head entry (oldest), if the ROB is non-empty.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            Some(&self.entries[self.head])
        }
    }

    /// Commits (retires) the head entry.
    ///
    /// Returns `None` if the ROB is empty or the head is still Issued.
    pub fn commit_head(&mut self) -> Option<RobEntry> {
        if self.count == 0 {
            return None;
        }

        if self.entries[self.head].state == RobState::Issued {
            return None; // not ready
        }

        let committed = self.entries[self.head].clone();
        self.entries[self.head].valid = false;
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        Some(committed)
    }

    /// Iterate over all valid entries from head to tail, calling `f` on each.
    pub fn for_each_valid(&self, mut f: impl FnMut(&RobEntry)) {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].valid {
                f(&self.entries[idx]);
            }
            idx = (idx + 1) % self.entries.len();
        }
    }

    /// Finds a reference to the entry with the given tag.
    pub fn find_entry(&self, tag: RobTag) -> Option<&RobEntry> {
        let idx = self.position(tag)?;
        Some(&self.entries[idx])
    }

    /// Finds a mutable reference to the entry with the given tag.
    fn find_entry_mut(&mut self, tag: RobTag) -> Option<&mut RobEntry> {
        let idx = self.position(tag)?;
        Some(&mut self.entries[idx])
    }

    fn position(&self, tag: RobTag) -> Option<usize> {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].valid && self.entries[idx].tag == tag {
                return Some(idx);
            }
            idx = (idx + 1) % self.entries.len();
        }
        None
    }
}

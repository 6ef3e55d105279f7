//! Physical Register File with renaming.
//!
//! This module implements the pool of rename targets. It provides:
//! 1. **Rename Map:** The architectural→physical mapping written by Decode.
//! 2. **Free List:** FIFO of unallocated slots handed out at rename.
//! 3. **Reader Tracking:** Pending-reader counts that keep a slot alive until its consumers have read it.
//! 4. **Reclamation:** A slot returns to the free list once it is superseded by a retired writer and unread.

use std::collections::VecDeque;

use serde::Serialize;

use crate::common::error::{Resource, SimError, SimResult};

/// Index of a physical register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PhysReg(pub usize);

/// State of one physical register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrfEntry {
    /// Slot is handed out to an instruction.
    pub allocated: bool,
    /// Architectural register the slot was allocated for.
    pub arch: usize,
    /// Current value.
    pub value: i32,
    /// The producer has written `value`.
    pub ready: bool,
    /// This is the newest mapping of `arch`.
    pub latest: bool,
    /// Renamed consumers that still have to read `value`.
    pub readers: u32,
    /// A younger writer of `arch` has retired.
    pub superseded: bool,
}

/// One row of the rename table as exposed in snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PrfMapping {
    /// Physical slot.
    pub slot: usize,
    /// Architectural register mapped to the slot.
    pub arch: usize,
    /// Current value.
    pub value: i32,
    /// The producer has written `value`.
    pub ready: bool,
    /// This is the newest mapping of `arch`.
    pub latest: bool,
}

/// Physical register file with an explicit rename map and free list.
#[derive(Clone, Debug)]
pub struct Prf {
    entries: Vec<PrfEntry>,
    free_list: VecDeque<PhysReg>,
    rename_map: Vec<Option<PhysReg>>,
}

impl Prf {
    /// Creates a file of `size` physical registers renaming `arch_regs` architectural ones.
    pub fn new(size: usize, arch_regs: usize) -> Self {
        Self {
            entries: vec![PrfEntry::default(); size],
            free_list: (0..size).map(PhysReg).collect(),
            rename_map: vec![None; arch_regs],
        }
    }

    /// Number of physical registers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the file has no registers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of unallocated slots.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Returns the entry for `reg`.
    pub fn entry(&self, reg: PhysReg) -> Option<&PrfEntry> {
        self.entries.get(reg.0)
    }

    /// Latest mapping of architectural register `arch`.
    pub fn lookup(&self, arch: usize) -> Option<PhysReg> {
        self.rename_map.get(arch).copied().flatten()
    }

    /// Allocates a slot as the new latest mapping of `arch`.
    ///
    /// The new slot is marked latest before the previous mapping loses the
    /// flag. Returns the new slot together with the mapping it replaced.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ResourceExhausted` when the free list is empty.
    pub fn allocate(&mut self, arch: usize) -> SimResult<(PhysReg, Option<PhysReg>)> {
        let reg = self.free_list.pop_front().ok_or(SimError::ResourceExhausted {
            resource: Resource::Prf,
        })?;

        self.entries[reg.0] = PrfEntry {
            allocated: true,
            arch,
            value: 0,
            ready: false,
            latest: true,
            readers: 0,
            superseded: false,
        };

        let prev = self.rename_map[arch].replace(reg);
        if let Some(p) = prev {
            self.entries[p.0].latest = false;
        }
        Ok((reg, prev))
    }

    /// Registers a pending reader on `reg`.
    pub fn acquire_reader(&mut self, reg: PhysReg) {
        if let Some(entry) = self.entries.get_mut(reg.0) {
            entry.readers += 1;
        }
    }

    /// Drops a pending reader from `reg`, reclaiming the slot if nothing holds it.
    pub fn release_reader(&mut self, reg: PhysReg) {
        if let Some(entry) = self.entries.get_mut(reg.0) {
            entry.readers = entry.readers.saturating_sub(1);
        }
        self.try_free(reg);
    }

    /// Value of `reg` if its producer has written it.
    pub fn read(&self, reg: PhysReg) -> Option<i32> {
        self.entries
            .get(reg.0)
            .filter(|e| e.allocated && e.ready)
            .map(|e| e.value)
    }

    /// Writes a produced value and marks the slot ready.
    pub fn write(&mut self, reg: PhysReg, value: i32) {
        if let Some(entry) = self.entries.get_mut(reg.0) {
            entry.value = value;
            entry.ready = true;
        }
    }

    /// Marks a mapping superseded by a retired writer, reclaiming it if unread.
    pub fn release_superseded(&mut self, reg: PhysReg) {
        if let Some(entry) = self.entries.get_mut(reg.0) {
            entry.superseded = true;
        }
        self.try_free(reg);
    }

    fn try_free(&mut self, reg: PhysReg) {
        let Some(entry) = self.entries.get_mut(reg.0) else {
            return;
        };
        if entry.allocated && entry.superseded && !entry.latest && entry.readers == 0 {
            *entry = PrfEntry::default();
            self.free_list.push_back(reg);
        }
    }

    /// Returns true if every architectural register has at most one latest
    /// mapping and the rename map agrees with it.
    pub fn latest_mappings_consistent(&self) -> bool {
        let mut seen = vec![0_usize; self.rename_map.len()];
        for (slot, entry) in self.entries.iter().enumerate() {
            if !entry.latest {
                continue;
            }
            if !entry.allocated || entry.arch >= seen.len() {
                return false;
            }
            seen[entry.arch] += 1;
            if self.rename_map[entry.arch] != Some(PhysReg(slot)) {
                return false;
            }
        }
        seen.iter().all(|&n| n <= 1)
            && self
                .rename_map
                .iter()
                .enumerate()
                .all(|(arch, m)| m.is_none_or(|p| seen[arch] == 1 && self.entries[p.0].latest))
    }

    /// Allocated slots in index order.
    pub fn mappings(&self) -> Vec<PrfMapping> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.allocated)
            .map(|(slot, e)| PrfMapping {
                slot,
                arch: e.arch,
                value: e.value,
                ready: e.ready,
                latest: e.latest,
            })
            .collect()
    }
}

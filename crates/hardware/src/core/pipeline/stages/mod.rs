//! Pipeline stage implementations.
//!
//! This module contains one free function per pipeline stage. Each takes the
//! CPU state plus the latches it reads and writes. It includes:
//! 1. **Fetch:** Retrieves instructions from the program store at the PC.
//! 2. **Decode:** Renames registers, allocates ROB entries, and resolves branches.
//! 3. **Integer FU:** Two-stage chain for ALU operations and address generation.
//! 4. **Multiply FU:** Three-stage chain producing products at its last stage.
//! 5. **Memory:** Performs loads and stores against data memory.
//! 6. **Retire:** Commits the ROB head into architectural state.

/// Decode/rename stage implementation.
pub mod decode;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Integer functional unit stages.
pub mod int_fu;

/// Memory access stage implementation.
pub mod memory;

/// Multiply functional unit stages.
pub mod mul_fu;

/// Retire (commit) stage implementation.
pub mod retire;

/// Decode stage entry point.
pub use decode::decode_stage;
/// Fetch stage entry point.
pub use fetch::fetch_stage;
/// Integer FU entry points.
pub use int_fu::{int_fu1_stage, int_fu2_stage};
/// Memory stage entry point.
pub use memory::mem_stage;
/// Multiply FU entry points.
pub use mul_fu::{mul_fu1_stage, mul_fu2_stage, mul_fu3_stage};
/// Retire stage entry point.
pub use retire::retire_stage;

use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;

/// Reads the sources at `indices` through their captured tags.
///
/// Returns `false` without side effects if any producer has not written its
/// value yet. Otherwise copies every value into `src_values`, drops the
/// pending-reader holds, and clears the tags.
pub(crate) fn read_operands(cpu: &mut Cpu, latch: &mut Latch, indices: &[usize]) -> bool {
    let ready = indices.iter().all(|&i| {
        latch.src_tags[i].is_none_or(|tag| cpu.prf.read(tag).is_some())
    });
    if !ready {
        return false;
    }

    for &i in indices {
        if let Some(tag) = latch.src_tags[i].take()
            && let Some(value) = cpu.prf.read(tag)
        {
            latch.src_values[i] = value;
            cpu.prf.release_reader(tag);
        }
    }
    true
}

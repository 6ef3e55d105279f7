//! Execution units and functional components.
//!
//! This module contains the arithmetic shared by the functional-unit stages.

/// Arithmetic Logic Unit for integer and multiply operations.
pub mod alu;

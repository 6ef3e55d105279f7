//! ALU arithmetic operations.
//!
//! Integer addition, subtraction, multiplication, and effective-address
//! generation over 32-bit values. Every operation wraps.

/// `a + b`, wrapping.
#[inline]
pub const fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// `a - b`, wrapping.
#[inline]
pub const fn sub(a: i32, b: i32) -> i32 {
    a.wrapping_sub(b)
}

/// `a * b`, keeping the low 32 bits.
#[inline]
pub const fn mul(a: i32, b: i32) -> i32 {
    a.wrapping_mul(b)
}

/// Effective address `base + offset` of a load or store.
#[inline]
pub const fn effective_address(base: i32, offset: i32) -> i32 {
    base.wrapping_add(offset)
}

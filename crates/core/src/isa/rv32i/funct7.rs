//! Base integer function codes (funct7, bits 31-25).

/// Default value (ADD, SRL, and every other R-type operation).
pub const DEFAULT: u32 = 0b000_0000;

/// Alternate value selecting SUB and SRA / SRAI.
pub const ALT: u32 = 0b010_0000;

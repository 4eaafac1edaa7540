//! Base integer function codes (funct3, bits 14-12).

/// Load byte (signed).
pub const LB: u32 = 0b000;
/// Load halfword (signed).
pub const LH: u32 = 0b001;
/// Load word.
pub const LW: u32 = 0b010;
/// Load byte unsigned.
pub const LBU: u32 = 0b100;
/// Load halfword unsigned.
pub const LHU: u32 = 0b101;

/// Store byte.
pub const SB: u32 = 0b000;
/// Store halfword.
pub const SH: u32 = 0b001;
/// Store word.
pub const SW: u32 = 0b010;

/// Branch equal.
pub const BEQ: u32 = 0b000;
/// Branch not equal.
pub const BNE: u32 = 0b001;
/// Branch less than (signed).
pub const BLT: u32 = 0b100;
/// Branch greater or equal (signed).
pub const BGE: u32 = 0b101;
/// Branch less than unsigned.
pub const BLTU: u32 = 0b110;
/// Branch greater or equal unsigned.
pub const BGEU: u32 = 0b111;

/// Add / subtract.
pub const ADD_SUB: u32 = 0b000;
/// Shift left logical.
pub const SLL: u32 = 0b001;
/// Set less than.
pub const SLT: u32 = 0b010;
/// Set less than unsigned.
pub const SLTU: u32 = 0b011;
/// Exclusive or.
pub const XOR: u32 = 0b100;
/// Shift right (logical or arithmetic by funct7).
pub const SRL_SRA: u32 = 0b101;
/// Or.
pub const OR: u32 = 0b110;
/// And.
pub const AND: u32 = 0b111;

/// Jump and link register.
pub const JALR: u32 = 0b000;

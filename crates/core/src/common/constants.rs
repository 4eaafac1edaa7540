//! Global constants shared by the encoder, the oracle and the builder.

/// Size of an instruction and of a captured result word in bytes.
pub const WORD_BYTES: u32 = 4;

/// Bits occupied by the low part of a `lui`/`addi` constant pair.
pub const LOWER_BITS: u32 = 12;

/// Rounding bias applied before splitting a constant into `lui`/`addi` parts.
pub const UPPER_ROUNDING: i64 = 0x800;

/// Width of the `lui`/`auipc` immediate field.
pub const UPPER_BITS: u32 = 20;

/// Shift amounts use the low five bits of the operand.
pub const SHIFT_MASK: u32 = 0x1f;

/// Range applied to shift-immediate operands.
pub const SHIFT_RANGE: i64 = 32;

/// Offset `srai` carries in its decoded immediate, from funct7 bit 30 overlapping the field.
pub const SRAI_IMM_BIAS: i64 = 1024;

/// Number of fields in a decode-signal record.
pub const DECODE_FIELDS: usize = 17;

/// Machine encoding of `addi x0, x0, 0`.
pub const NOP_WORD: u32 = 0x0000_0013;

//! Immediate codec.
//!
//! Maps a raw, non-negative magnitude onto the immediate an instruction can actually carry.
//! The mapping is:
//! 1. **Range:** Right-shift until the value fits the format's field width.
//! 2. **Alignment:** Clear bit 0 for branch and `jal` displacements.
//! 3. **Shift amounts:** Reduce modulo 32 for shift mnemonics.
//! 4. **Sign:** Reinterpret as two's complement, except for `lui`/`auipc`.
//!
//! The value produced by [`encode`] is what appears in assembly text. The value the
//! decoder reports is given by [`decoded`], which differs for `srai` and the upper formats.

use super::format::InstructionFormat;
use super::mnemonic::{Class, Mnemonic};
use crate::common::Rng;
use crate::common::constants::{
    LOWER_BITS, SHIFT_RANGE, SRAI_IMM_BIAS, UPPER_BITS, UPPER_ROUNDING,
};

/// Reinterprets the low `bits` of `value` as a two's-complement number.
pub const fn sign_adjust(value: i64, bits: u32) -> i64 {
    let masked = value & ((1 << bits) - 1);
    if masked >= 1 << (bits - 1) { masked - (1 << bits) } else { masked }
}

/// Draws a magnitude uniformly from the format's value range.
pub const fn random_magnitude(format: InstructionFormat, rng: &mut Rng) -> i64 {
    rng.bits(format.imm_bits()) as i64
}

/// Brings `magnitude` into the immediate range of `mnemonic`.
///
/// Negative inputs are treated as already ranged and only pass through the alignment and
/// shift-amount steps; this is how pre-computed offsets are rendered.
///
/// # Arguments
///
/// * `mnemonic`  - Instruction whose format determines width and rules.
/// * `magnitude` - Seed value.
///
/// # Returns
///
/// The immediate as written in assembly text.
pub fn encode(mnemonic: Mnemonic, magnitude: i64) -> i64 {
    let bits = mnemonic.format().imm_bits();
    if bits == 0 {
        return 0;
    }
    let limit = 1_i64 << bits;
    let mut imm = magnitude;
    while imm >= limit {
        imm >>= 1;
    }
    if mnemonic.class() == Class::Branch || mnemonic == Mnemonic::Jal {
        imm &= !1;
    }
    if mnemonic.is_shift_imm() {
        imm = imm.rem_euclid(SHIFT_RANGE);
    }
    if mnemonic.class() != Class::Upper && imm >= limit / 2 {
        imm -= limit;
    }
    imm
}

/// Immediate value the decoder reports for an encoded immediate.
///
/// `srai` carries funct7 bit 30 inside the immediate field, and the upper formats report the
/// field already shifted into place.
pub const fn decoded(mnemonic: Mnemonic, imm: i64) -> i64 {
    match mnemonic {
        Mnemonic::Srai => imm + SRAI_IMM_BIAS,
        Mnemonic::Lui | Mnemonic::Auipc => ((imm << LOWER_BITS) as u32 as i32) as i64,
        _ => imm,
    }
}

/// Splits a 32-bit constant into a `lui` immediate and an `addi` offset.
///
/// The offset is sign-extended by `addi`, so the upper part is rounded to compensate.
///
/// # Returns
///
/// `(ui, offset)` with `ui` in `[0, 2^20)` and `offset` in `[-2048, 2047]`, such that
/// `(ui << 12) + offset == value` modulo 2^32.
pub const fn split_upper(value: u32) -> (i64, i64) {
    let value = value as i64;
    let ui = ((value + UPPER_ROUNDING) >> LOWER_BITS).rem_euclid(1 << UPPER_BITS);
    (ui, sign_adjust(value, LOWER_BITS))
}

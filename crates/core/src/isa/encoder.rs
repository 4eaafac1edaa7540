//! Instruction encoder.
//!
//! Turns a mnemonic, its register slots and an immediate into assembly text, the expected
//! decode signals and, when the immediate is numeric, the machine word.

use super::fields::encode_word;
use super::immediate;
use super::mnemonic::{Class, Mnemonic};
use super::signals::{DecodeSignals, Operands};
use crate::common::Reg;
use crate::program::Label;

/// Immediate operand of an instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Immediate {
    /// Magnitude seed, ranged by [`immediate::encode`].
    Value(i64),
    /// Branch or jump target.
    Label(Label),
}

/// Output of [`build`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    /// Mnemonic.
    pub mnemonic: Mnemonic,
    /// Assembly text.
    pub text: String,
    /// Expected decode signals.
    pub signals: DecodeSignals,
    /// Machine word, unknown for label targets.
    pub word: Option<u32>,
    /// Label the instruction refers to.
    pub target: Option<Label>,
}

impl Encoded {
    /// Immediate as written in the assembly text, when numeric.
    pub const fn text_imm(&self) -> Option<i64> {
        match (self.signals.imm, self.mnemonic) {
            (Some(imm), Mnemonic::Srai) => Some(imm - crate::common::constants::SRAI_IMM_BIAS),
            (Some(imm), Mnemonic::Lui | Mnemonic::Auipc) => Some((imm as u32 >> 12) as i64),
            (imm, _) => imm,
        }
    }
}

fn r(reg: Option<Reg>) -> Reg {
    reg.unwrap_or(Reg::ZERO)
}

/// Encodes one instruction.
///
/// # Arguments
///
/// * `mnemonic` - Instruction to build.
/// * `ops`      - Register slots; slots the mnemonic does not use are dropped.
/// * `imm`      - Immediate seed or label; ignored for register-register and bare forms.
///
/// # Returns
///
/// The rendered instruction. Missing register slots that the syntax needs render as `x0`.
///
/// # Examples
///
/// ```
/// use rvtest_core::common::Reg;
/// use rvtest_core::isa::encoder::{Immediate, build};
/// use rvtest_core::isa::signals::Operands;
/// use rvtest_core::isa::Mnemonic;
///
/// let ops = Operands::new(Reg::new(5), Reg::new(0), None);
/// let enc = build(Mnemonic::Addi, ops, &Immediate::Value(12));
/// assert_eq!(enc.text, "addi x5, x0, 12");
/// assert_eq!(enc.signals.imm, Some(12));
/// ```
pub fn build(mnemonic: Mnemonic, ops: Operands, imm: &Immediate) -> Encoded {
    let ops = ops.used_by(mnemonic);
    let class = mnemonic.class();
    let has_imm = mnemonic.format().imm_bits() > 0 && !mnemonic.is_bare();

    let (value, target) = match imm {
        _ if !has_imm => (None, None),
        Immediate::Value(seed) => (Some(immediate::encode(mnemonic, *seed)), None),
        Immediate::Label(label) => (None, Some(label.clone())),
    };
    let operand = match (&target, value) {
        (Some(label), _) => label.to_string(),
        (None, Some(v)) => format!(".{v:+}"),
        (None, None) => ".+0".to_string(),
    };

    let name = mnemonic.name();
    let v = value.unwrap_or(0);
    let text = match class {
        _ if mnemonic.is_bare() => name.to_string(),
        Class::Load => format!("{name} {}, {v}({})", r(ops.rd), r(ops.rs1)),
        Class::Store => format!("{name} {}, {v}({})", r(ops.rs2), r(ops.rs1)),
        Class::Branch => format!("{name} {}, {}, {operand}", r(ops.rs1), r(ops.rs2)),
        Class::Jump if mnemonic == Mnemonic::Jal => format!("{name} {}, {operand}", r(ops.rd)),
        Class::Upper => format!("{name} {}, {v}", r(ops.rd)),
        Class::Op => format!("{name} {}, {}, {}", r(ops.rd), r(ops.rs1), r(ops.rs2)),
        _ => format!("{name} {}, {}, {v}", r(ops.rd), r(ops.rs1)),
    };

    let decoded = value.map(|v| immediate::decoded(mnemonic, v));
    let signals = DecodeSignals::derive(mnemonic, ops, decoded);
    let word = if target.is_some() {
        None
    } else {
        Some(encode_word(mnemonic, ops.rd, ops.rs1, ops.rs2, decoded.unwrap_or(0)))
    };
    Encoded { mnemonic, text, signals, word, target }
}

/// Encodes an instruction from already-ranged operands.
///
/// Shorthand for setup sequences, where every value is known to fit.
pub fn emit(mnemonic: Mnemonic, rd: Option<Reg>, rs1: Option<Reg>, rs2: Option<Reg>, imm: i64) -> Encoded {
    build(mnemonic, Operands::new(rd, rs1, rs2), &Immediate::Value(imm))
}

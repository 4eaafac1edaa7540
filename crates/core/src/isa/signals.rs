//! Expected decoder control signals.
//!
//! [`DecodeSignals`] is the 17-field record a decoder testbench prints for each instruction.
//! Every field that a given mnemonic leaves unconstrained is `None` and is never compared.

use super::format::InstructionFormat;
use super::mnemonic::{Class, MemWidth, Mnemonic};
use crate::common::Reg;
use crate::common::constants::DECODE_FIELDS;

/// Field names in trace column order.
pub const FIELD_NAMES: [&str; DECODE_FIELDS] = [
    "imm",
    "inst_type",
    "rs1",
    "rs2",
    "rd",
    "branch",
    "jump",
    "compare",
    "cmp_imm",
    "cmp_op",
    "alu_imm",
    "alu_pc",
    "alu_op",
    "mem_read",
    "mem_write",
    "mem_size",
    "mem_unsigned",
];

/// Comparator opcode for signed less-than (shared by `blt` and `slt`).
const CMP_LT: i64 = 4;
/// Comparator opcode for unsigned less-than (shared by `bltu` and `sltu`).
const CMP_LTU: i64 = 6;

/// Register slots an instruction actually uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Operands {
    /// Destination register.
    pub rd: Option<Reg>,
    /// First source register.
    pub rs1: Option<Reg>,
    /// Second source register.
    pub rs2: Option<Reg>,
}

impl Operands {
    /// Creates an operand set from all three slots.
    pub const fn new(rd: Option<Reg>, rs1: Option<Reg>, rs2: Option<Reg>) -> Self {
        Self { rd, rs1, rs2 }
    }

    /// Keeps only the slots `mnemonic` encodes.
    ///
    /// Bare mnemonics report `rd = x0` and no sources.
    pub const fn used_by(self, mnemonic: Mnemonic) -> Self {
        if mnemonic.is_bare() {
            return Self::new(Some(Reg::ZERO), None, None);
        }
        match mnemonic.class() {
            Class::Op => self,
            Class::OpImm | Class::Load => Self::new(self.rd, self.rs1, None),
            Class::Store | Class::Branch => Self::new(None, self.rs1, self.rs2),
            Class::Upper => Self::new(self.rd, None, None),
            Class::Jump => match mnemonic {
                Mnemonic::Jalr => Self::new(self.rd, self.rs1, None),
                _ => Self::new(self.rd, None, None),
            },
            Class::Misc => Self::new(Some(Reg::ZERO), None, None),
        }
    }
}

/// Decoder outputs expected for one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeSignals {
    /// Immediate as the decoder reports it.
    pub imm: Option<i64>,
    /// Format tag.
    pub format: InstructionFormat,
    /// Register slots.
    pub regs: Operands,
    /// Conditional branch.
    pub branch: bool,
    /// `jal` / `jalr`.
    pub jump: bool,
    /// Set-less-than family.
    pub compare: Option<bool>,
    /// Set-less-than with an immediate operand.
    pub cmp_imm: Option<bool>,
    /// Comparator opcode.
    pub cmp_op: Option<i64>,
    /// Second ALU operand is the immediate.
    pub alu_imm: Option<bool>,
    /// First ALU operand is the PC.
    pub alu_pc: Option<bool>,
    /// ALU opcode, only pinned for instructions that add.
    pub alu_op: Option<i64>,
    /// Load.
    pub mem_read: Option<bool>,
    /// Store.
    pub mem_write: bool,
    /// Access width.
    pub mem_size: Option<MemWidth>,
    /// Zero-extending load.
    pub mem_unsigned: Option<bool>,
}

impl DecodeSignals {
    /// Derives the expected signals from the mnemonic and its final immediate.
    ///
    /// # Arguments
    ///
    /// * `mnemonic` - Instruction.
    /// * `regs`     - Register slots already filtered by [`Operands::used_by`].
    /// * `imm`      - Decoded immediate, `None` for formats without one.
    pub fn derive(mnemonic: Mnemonic, regs: Operands, imm: Option<i64>) -> Self {
        let class = mnemonic.class();
        let format = mnemonic.format();
        let branch = class == Class::Branch;
        let compare = mnemonic.is_compare();
        let cmp_op = if compare {
            Some(if mnemonic.is_unsigned() { CMP_LTU } else { CMP_LT })
        } else {
            mnemonic.condition().map(|c| i64::from(c.funct3()))
        };
        let adds = matches!(mnemonic, Mnemonic::Add | Mnemonic::Addi)
            || matches!(
                class,
                Class::Load | Class::Store | Class::Branch | Class::Upper | Class::Jump
            );
        let width = mnemonic.mem_width();

        let mut signals = Self {
            imm,
            format,
            regs,
            branch,
            jump: class == Class::Jump,
            compare: Some(compare),
            cmp_imm: (compare || branch).then_some(compare && class == Class::OpImm),
            cmp_op,
            alu_imm: Some(format != InstructionFormat::R),
            alu_pc: Some(matches!(mnemonic, Mnemonic::Auipc | Mnemonic::Jal) || branch),
            alu_op: adds.then_some(0),
            mem_read: Some(class == Class::Load),
            mem_write: class == Class::Store,
            mem_size: width,
            mem_unsigned: width.map(|_| mnemonic.is_unsigned()),
        };
        if mnemonic.is_bare() {
            signals.imm = None;
            signals.compare = None;
            signals.cmp_imm = None;
            signals.alu_imm = None;
            signals.alu_pc = None;
            signals.mem_read = None;
        }
        signals
    }

    /// Field values in trace column order; booleans are 0/1, `None` is don't-care.
    pub fn values(&self) -> [Option<i64>; DECODE_FIELDS] {
        let flag = |b: bool| i64::from(b);
        let reg = |r: Option<Reg>| r.map(|r| i64::from(r.index()));
        [
            self.imm,
            Some(self.format.tag()),
            reg(self.regs.rs1),
            reg(self.regs.rs2),
            reg(self.regs.rd),
            Some(flag(self.branch)),
            Some(flag(self.jump)),
            self.compare.map(flag),
            self.cmp_imm.map(flag),
            self.cmp_op,
            self.alu_imm.map(flag),
            self.alu_pc.map(flag),
            self.alu_op,
            self.mem_read.map(flag),
            Some(flag(self.mem_write)),
            self.mem_size.map(MemWidth::tag),
            self.mem_unsigned.map(flag),
        ]
    }
}

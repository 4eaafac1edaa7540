//! Closed RV32E mnemonic vocabulary.
//!
//! This module classifies every mnemonic the generator can emit. It provides:
//! 1. **Vocabulary:** The [`Mnemonic`] enum and the [`Mnemonic::ALL`] emission order.
//! 2. **Classification:** Opcode class and instruction format of each mnemonic.
//! 3. **Semantics:** ALU operation, branch condition and memory width lookups for the oracle.

use std::fmt;

use super::format::InstructionFormat;
use crate::alu::AluOp;
use crate::alu::branch::BranchCond;

/// Opcode class of a mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Class {
    /// Register-register arithmetic.
    Op,
    /// Register-immediate arithmetic (including `nop`).
    OpImm,
    /// Loads.
    Load,
    /// Stores.
    Store,
    /// Conditional branches.
    Branch,
    /// `lui` and `auipc`.
    Upper,
    /// `jal` and `jalr`.
    Jump,
    /// `fence`, `ecall`, `ebreak`.
    Misc,
}

/// Access width of a load or store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemWidth {
    /// 8 bits.
    Byte,
    /// 16 bits.
    Half,
    /// 32 bits.
    Word,
}

impl MemWidth {
    /// Access size in bytes.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Value the decoder reports for this width.
    pub const fn tag(self) -> i64 {
        match self {
            Self::Byte => 0,
            Self::Half => 1,
            Self::Word => 2,
        }
    }
}

/// An RV32E mnemonic supported by the generator.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mnemonic {
    Add,
    Sub,
    And,
    Or,
    Xor,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
    Addi,
    Andi,
    Ori,
    Xori,
    Slli,
    Srli,
    Srai,
    Slti,
    Sltiu,
    Nop,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Lui,
    Auipc,
    Jal,
    Jalr,
    Fence,
    Ecall,
    Ebreak,
}

impl Mnemonic {
    /// Every mnemonic, in matrix emission order.
    pub const ALL: [Self; 41] = [
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Sll,
        Self::Srl,
        Self::Sra,
        Self::Slt,
        Self::Sltu,
        Self::Addi,
        Self::Andi,
        Self::Ori,
        Self::Xori,
        Self::Slli,
        Self::Srli,
        Self::Srai,
        Self::Slti,
        Self::Sltiu,
        Self::Nop,
        Self::Lb,
        Self::Lh,
        Self::Lw,
        Self::Lbu,
        Self::Lhu,
        Self::Sb,
        Self::Sh,
        Self::Sw,
        Self::Beq,
        Self::Bne,
        Self::Blt,
        Self::Bge,
        Self::Bltu,
        Self::Bgeu,
        Self::Lui,
        Self::Auipc,
        Self::Jal,
        Self::Jalr,
        Self::Fence,
        Self::Ecall,
        Self::Ebreak,
    ];

    /// Assembler spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Sll => "sll",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Addi => "addi",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Xori => "xori",
            Self::Slli => "slli",
            Self::Srli => "srli",
            Self::Srai => "srai",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Nop => "nop",
            Self::Lb => "lb",
            Self::Lh => "lh",
            Self::Lw => "lw",
            Self::Lbu => "lbu",
            Self::Lhu => "lhu",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bge => "bge",
            Self::Bltu => "bltu",
            Self::Bgeu => "bgeu",
            Self::Lui => "lui",
            Self::Auipc => "auipc",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Fence => "fence",
            Self::Ecall => "ecall",
            Self::Ebreak => "ebreak",
        }
    }

    /// Opcode class.
    pub const fn class(self) -> Class {
        match self {
            Self::Add
            | Self::Sub
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Sll
            | Self::Srl
            | Self::Sra
            | Self::Slt
            | Self::Sltu => Class::Op,
            Self::Addi
            | Self::Andi
            | Self::Ori
            | Self::Xori
            | Self::Slli
            | Self::Srli
            | Self::Srai
            | Self::Slti
            | Self::Sltiu
            | Self::Nop => Class::OpImm,
            Self::Lb | Self::Lh | Self::Lw | Self::Lbu | Self::Lhu => Class::Load,
            Self::Sb | Self::Sh | Self::Sw => Class::Store,
            Self::Beq | Self::Bne | Self::Blt | Self::Bge | Self::Bltu | Self::Bgeu => {
                Class::Branch
            }
            Self::Lui | Self::Auipc => Class::Upper,
            Self::Jal | Self::Jalr => Class::Jump,
            Self::Fence | Self::Ecall | Self::Ebreak => Class::Misc,
        }
    }

    /// Encoding format.
    pub const fn format(self) -> InstructionFormat {
        match self.class() {
            Class::Op => InstructionFormat::R,
            Class::OpImm | Class::Load | Class::Misc => InstructionFormat::I,
            Class::Store => InstructionFormat::S,
            Class::Branch => InstructionFormat::B,
            Class::Upper => InstructionFormat::U,
            Class::Jump => match self {
                Self::Jalr => InstructionFormat::I,
                _ => InstructionFormat::J,
            },
        }
    }

    /// True for mnemonics written without operands.
    pub const fn is_bare(self) -> bool {
        matches!(self, Self::Nop | Self::Fence | Self::Ecall | Self::Ebreak)
    }

    /// True for loads and stores.
    pub const fn is_memory(self) -> bool {
        matches!(self.class(), Class::Load | Class::Store)
    }

    /// True for immediate shifts, whose immediate is a 5-bit shift amount.
    pub const fn is_shift_imm(self) -> bool {
        matches!(self, Self::Slli | Self::Srli | Self::Srai)
    }

    /// True for `slt`, `sltu`, `slti`, `sltiu`.
    pub const fn is_compare(self) -> bool {
        matches!(self, Self::Slt | Self::Sltu | Self::Slti | Self::Sltiu)
    }

    /// True when the mnemonic's spelling ends in `u` (unsigned variants).
    pub fn is_unsigned(self) -> bool {
        self.name().ends_with('u')
    }

    /// ALU operation computed by an arithmetic mnemonic.
    ///
    /// # Returns
    ///
    /// `None` for everything that does not produce an ALU result in `rd`.
    pub const fn alu_op(self) -> Option<AluOp> {
        Some(match self {
            Self::Add | Self::Addi => AluOp::Add,
            Self::Sub => AluOp::Sub,
            Self::And | Self::Andi => AluOp::And,
            Self::Or | Self::Ori => AluOp::Or,
            Self::Xor | Self::Xori => AluOp::Xor,
            Self::Sll | Self::Slli => AluOp::Sll,
            Self::Srl | Self::Srli => AluOp::Srl,
            Self::Sra | Self::Srai => AluOp::Sra,
            Self::Slt | Self::Slti => AluOp::Slt,
            Self::Sltu | Self::Sltiu => AluOp::Sltu,
            _ => return None,
        })
    }

    /// Branch condition of a conditional branch.
    pub const fn condition(self) -> Option<BranchCond> {
        Some(match self {
            Self::Beq => BranchCond::Eq,
            Self::Bne => BranchCond::Ne,
            Self::Blt => BranchCond::Lt,
            Self::Bge => BranchCond::Ge,
            Self::Bltu => BranchCond::Ltu,
            Self::Bgeu => BranchCond::Geu,
            _ => return None,
        })
    }

    /// Access width of a load or store.
    pub const fn mem_width(self) -> Option<MemWidth> {
        match self {
            Self::Lb | Self::Lbu | Self::Sb => Some(MemWidth::Byte),
            Self::Lh | Self::Lhu | Self::Sh => Some(MemWidth::Half),
            Self::Lw | Self::Sw => Some(MemWidth::Word),
            _ => None,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

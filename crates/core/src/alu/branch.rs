//! Branch conditions.

use std::fmt;

use crate::isa::rv32i::funct3;

/// Condition tested by a conditional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchCond {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Signed less than.
    Lt,
    /// Signed greater or equal.
    Ge,
    /// Unsigned less than.
    Ltu,
    /// Unsigned greater or equal.
    Geu,
}

impl BranchCond {
    /// Evaluates the condition on two register words.
    pub const fn holds(self, a: u32, b: u32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => (a as i32) < (b as i32),
            Self::Ge => (a as i32) >= (b as i32),
            Self::Ltu => a < b,
            Self::Geu => a >= b,
        }
    }

    /// Comparator opcode, equal to the branch's funct3.
    pub const fn funct3(self) -> u32 {
        match self {
            Self::Eq => funct3::BEQ,
            Self::Ne => funct3::BNE,
            Self::Lt => funct3::BLT,
            Self::Ge => funct3::BGE,
            Self::Ltu => funct3::BLTU,
            Self::Geu => funct3::BGEU,
        }
    }
}

impl fmt::Display for BranchCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

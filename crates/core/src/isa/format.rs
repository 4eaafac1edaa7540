//! Instruction formats.

use std::fmt;

/// One of the six base encodings, with its decoder tag as the discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionFormat {
    /// Register-register.
    R = 0,
    /// Register-immediate, loads, `jalr` and system instructions.
    I = 1,
    /// Stores.
    S = 2,
    /// Conditional branches.
    B = 3,
    /// Upper immediate.
    U = 4,
    /// Jump and link.
    J = 5,
}

impl InstructionFormat {
    /// Value the decoder reports for this format.
    #[inline]
    pub const fn tag(self) -> i64 {
        self as i64
    }

    /// Width in bits of the immediate the format carries.
    pub const fn imm_bits(self) -> u32 {
        match self {
            Self::R => 0,
            Self::I | Self::S => 12,
            Self::B => 13,
            Self::U => 20,
            Self::J => 21,
        }
    }
}

impl fmt::Display for InstructionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R => "R",
            Self::I => "I",
            Self::S => "S",
            Self::B => "B",
            Self::U => "U",
            Self::J => "J",
        };
        write!(f, "{name}-type")
    }
}

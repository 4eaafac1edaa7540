//! RV32E register indices.
//!
//! The embedded base ISA has sixteen integer registers. `x0` is hard-wired to zero, so any
//! value written to it is discarded and any read returns zero.

use std::fmt;

use serde::Deserialize;

/// Number of integer registers in RV32E.
pub const REG_COUNT: u8 = 16;

/// An integer register index in `0..16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub struct Reg(u8);

impl Reg {
    /// Hard-wired zero register.
    pub const ZERO: Self = Self(0);
    /// Return-address register linked by `jal`/`jalr` and read by `ret`.
    pub const RA: Self = Self(1);
    /// Scratch register used to materialise result and setup addresses.
    pub const SCRATCH: Self = Self(5);

    /// Creates a register index.
    ///
    /// # Returns
    ///
    /// `None` when `index` is outside the RV32E register file.
    pub const fn new(index: u8) -> Option<Self> {
        if index < REG_COUNT { Some(Self(index)) } else { None }
    }

    /// Returns the raw register index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns true for `x0`.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for Reg {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("register x{value} is outside RV32E"))
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

//! Expected-value model.
//!
//! Computes what a test case leaves in its destination register, from the values its setup
//! sequence writes and the architectural rules for `x0` and aliased sources.

use crate::alu::branch::BranchCond;
use crate::alu::{Alu, AluOp};
use crate::common::Reg;
use crate::config::Endianness;
use crate::isa::{MemWidth, Mnemonic};

/// Source operand values after setup, with `x0` reading zero and `rs1 == rs2` aliasing.
///
/// Setup writes `rs2` first and `rs1` second, so an aliased pair holds `v1`.
pub const fn operands(rs1: Reg, rs2: Reg, v1: u32, v2: u32) -> (u32, u32) {
    let a = if rs1.is_zero() { 0 } else { v1 };
    let b = if rs2.is_zero() {
        0
    } else if rs1.index() == rs2.index() {
        a
    } else {
        v2
    };
    (a, b)
}

/// Result of a register-register or register-immediate operation.
///
/// # Arguments
///
/// * `op`  - ALU operation.
/// * `rs1`/`rs2` - Source registers; `rs2` is ignored when `imm` is present.
/// * `v1`/`v2`   - Values written by setup.
/// * `imm` - Immediate as written in assembly text, for register-immediate forms.
pub const fn alu(op: AluOp, rs1: Reg, rs2: Reg, v1: u32, v2: u32, imm: Option<i64>) -> i32 {
    let (a, b) = operands(rs1, rs2, v1, v2);
    let b = match imm {
        Some(imm) => imm as u32,
        None => b,
    };
    Alu::result(op, a, b)
}

/// A load or store target inside one aligned word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// Access address, aligned to the width.
    pub addr: u32,
    /// Access width.
    pub width: MemWidth,
}

impl MemAccess {
    /// Forces `addr` into the data region and aligns it to `width`.
    pub const fn new(addr: u32, data_region: u32, width: MemWidth) -> Self {
        let addr = (addr | data_region) & !(width.bytes() - 1);
        Self { addr, width }
    }

    /// Address of the word containing the access.
    pub const fn word_addr(self) -> u32 {
        self.addr & !3
    }

    /// Byte offset inside the word.
    pub const fn offset(self) -> u32 {
        self.addr & 3
    }

    /// Bit position of the accessed bytes inside the word.
    pub const fn shift(self, endianness: Endianness) -> u32 {
        let bytes = match endianness {
            Endianness::Little => self.offset(),
            Endianness::Big => 4 - self.width.bytes() - self.offset(),
        };
        8 * bytes
    }

    /// Mask of the accessed bits, before shifting.
    pub const fn mask(self) -> u32 {
        match self.width {
            MemWidth::Byte => 0xff,
            MemWidth::Half => 0xffff,
            MemWidth::Word => 0xffff_ffff,
        }
    }

    /// Value a load returns from a word holding `word`.
    pub const fn load(self, mnemonic: Mnemonic, word: u32, endianness: Endianness) -> i32 {
        let raw = (word >> self.shift(endianness)) & self.mask();
        let bits = 8 * self.width.bytes();
        if matches!(mnemonic, Mnemonic::Lbu | Mnemonic::Lhu) || bits == 32 {
            raw as i32
        } else {
            ((raw << (32 - bits)) as i32) >> (32 - bits)
        }
    }

    /// Word left in zeroed memory after storing `value`.
    pub const fn store(self, value: u32, endianness: Endianness) -> i32 {
        ((value & self.mask()) << self.shift(endianness)) as i32
    }
}

/// Register a loop back-edge increments so that the branch condition eventually fails.
///
/// `bne` advances whichever operand is numerically behind, `bge`/`bgeu` advance `rs2`, and
/// the less-than and equality branches advance `rs1`.
pub const fn loop_counter(mnemonic: Mnemonic, rs1: Reg, rs2: Reg, a: u32, b: u32) -> Reg {
    match mnemonic {
        Mnemonic::Bne => {
            if a > b {
                rs2
            } else {
                rs1
            }
        }
        Mnemonic::Bge | Mnemonic::Bgeu => rs2,
        _ => rs1,
    }
}

/// Operands for a loop on `mnemonic` whose body runs exactly `trips` times.
///
/// `seed` is folded so every operand stays within the same half of the 32-bit range as
/// the seed, where neither the signed nor the unsigned comparison wraps. `trips` is at
/// least one; `beq` ignores it and runs once.
pub const fn short_loop_operands(mnemonic: Mnemonic, seed: u32, trips: u32) -> (u32, u32) {
    const HALF: u32 = 0x8000_0000;
    let base = (seed & HALF) | ((seed & !HALF) % (HALF - trips));
    match mnemonic {
        Mnemonic::Bge | Mnemonic::Bgeu => (base + trips - 1, base),
        Mnemonic::Beq => (base, base),
        _ => (base, base + trips),
    }
}

/// Number of times a check-first loop body runs.
///
/// # Returns
///
/// `None` when the loop would run more than `bound` times, including when the counter is
/// `x0` or aliasing keeps the condition true forever.
pub fn loop_trips(
    cond: BranchCond,
    (rs1, rs2): (Reg, Reg),
    (a, b): (u32, u32),
    counter: Reg,
    bound: u32,
) -> Option<u32> {
    let (mut a, mut b) = (a, b);
    let mut trips = 0;
    while cond.holds(a, b) {
        if trips == bound {
            return None;
        }
        trips += 1;
        if counter.is_zero() {
            continue;
        }
        if counter == rs1 {
            a = a.wrapping_add(1);
        }
        if counter == rs2 {
            b = b.wrapping_add(1);
        }
    }
    Some(trips)
}

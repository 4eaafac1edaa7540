//! Reference Arithmetic Logic Unit (ALU).
//!
//! This module is the oracle for every value-producing instruction under test. It computes
//! RV32 results over `u32` operands with two's-complement wraparound, and branch conditions
//! over the same words. Results are reported as `i32`, the form a trace prints them in.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub
//! - [`logic`]:      Or, And, Xor, Slt, Sltu
//! - [`shifts`]:     Sll, Srl, Sra
//! - [`branch`]:     Eq, Ne, Lt, Ge, Ltu, Geu

/// Integer arithmetic operations (add, subtract).
pub mod arithmetic;

/// Branch conditions.
pub mod branch;

/// Bitwise logical and comparison operations (or, and, xor, slt).
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use std::fmt;

/// ALU operation types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Integer addition.
    Add,
    /// Integer subtraction.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set less than (signed).
    Slt,
    /// Set less than unsigned.
    Sltu,
    /// Bitwise XOR.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Bitwise OR.
    Or,
    /// Bitwise AND.
    And,
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reference ALU.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a`  - First operand
    /// * `b`  - Second operand (also used as shift amount)
    ///
    /// # Returns
    ///
    /// The 32-bit result word.
    ///
    /// # Examples
    ///
    /// ```
    /// use rvtest_core::alu::{Alu, AluOp};
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 0x7fff_ffff, 1), 0x8000_0000);
    /// assert_eq!(Alu::execute(AluOp::Sra, 0x8000_0000, 31), 0xffff_ffff);
    /// assert_eq!(Alu::execute(AluOp::Slt, -5_i32 as u32, 10), 1);
    /// ```
    pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
        match op {
            AluOp::Add | AluOp::Sub => arithmetic::execute(op, a, b),
            AluOp::Or | AluOp::And | AluOp::Xor | AluOp::Slt | AluOp::Sltu => {
                logic::execute(op, a, b)
            }
            AluOp::Sll | AluOp::Srl | AluOp::Sra => shifts::execute(op, a, b),
        }
    }

    /// Executes `op` and returns the result as a signed register value.
    pub const fn result(op: AluOp, a: u32, b: u32) -> i32 {
        Self::execute(op, a, b) as i32
    }
}

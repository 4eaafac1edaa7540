//! RV32E base integer encoding constants.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (bits 6-0).
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Upper function bits for register-register operations and `srai`.

/// Function code 3 definitions.
pub mod funct3;

/// Function code 7 definitions.
pub mod funct7;

/// Major opcodes.
pub mod opcodes;

//! Instruction Set Architecture (ISA) model for RV32E test generation.
//!
//! This module describes the instructions the generator emits. It provides:
//! 1. **Vocabulary:** The closed mnemonic set and its classification.
//! 2. **Formats:** The six base encodings and their immediate widths.
//! 3. **Immediates:** Ranging, alignment and sign rules for every format.
//! 4. **Encoding:** Assembly text, machine words and expected decoder signals.

/// Instruction encoder (text, word, signals).
pub mod encoder;

/// Machine-word packing and immediate extraction.
pub mod fields;

/// Instruction formats.
pub mod format;

/// Immediate codec.
pub mod immediate;

/// Mnemonic vocabulary and classification.
pub mod mnemonic;

/// RV32E opcode and function-code constants.
pub mod rv32i;

/// Expected decoder signals.
pub mod signals;

pub use encoder::{Encoded, Immediate};
pub use format::InstructionFormat;
pub use mnemonic::{Class, MemWidth, Mnemonic};
pub use signals::{DecodeSignals, Operands};

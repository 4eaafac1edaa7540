//! RV32E test-vector generation and trace verification library.
//!
//! This crate builds assembly programs that exercise an RV32E processor design and checks
//! the design's simulation trace against an in-software model. It provides:
//! 1. **ISA:** Mnemonic classification, immediate codec, machine-word packing and expected decode signals.
//! 2. **Oracle:** Reference ALU and branch semantics over 32-bit words.
//! 3. **Builder:** Self-checking test cases for ALU, memory, upper-immediate, branch and jump instructions.
//! 4. **Program:** Linear listings with label bookkeeping and an address-keyed dedup cache.
//! 5. **Suite:** Enumeration of the decode and core matrices and the pass runner.
//! 6. **Toolchain & Verify:** External assembler/simulator adapters and strict trace parsing.

/// Reference ALU and branch-condition semantics.
pub mod alu;
/// Test-case construction (setup sequences, layouts, expected values).
pub mod builder;
/// Common types (registers, RNG, errors, constants).
pub mod common;
/// Run configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Instruction set model (mnemonics, formats, immediates, decode signals, encoder).
pub mod isa;
/// Program listings and the address-keyed dedup cache.
pub mod program;
/// Run statistics and reporting.
pub mod stats;
/// Test-matrix enumeration and pass orchestration.
pub mod suite;
/// External assembler and simulator adapters.
pub mod toolchain;
/// Trace parsing and expected-value comparison.
pub mod verify;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Top-level error type carrying the process exit code.
pub use crate::common::error::Error;
/// Main orchestrator; construct with `Suite::new`.
pub use crate::suite::Suite;

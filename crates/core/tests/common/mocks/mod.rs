//! `mockall` doubles for the external tools.

/// Assembler double and expectation helpers.
pub mod assembler;

/// Simulator double and expectation helpers.
pub mod simulator;

pub use assembler::{MockAssembler, assembler, expect_assembly, failing_assembler};
pub use simulator::{MockSimulator, expect_testbench, simulator};

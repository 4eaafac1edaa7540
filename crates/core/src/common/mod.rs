//! Common utilities and types shared by every stage of the generator.
//!
//! This module provides:
//! 1. **Registers:** A strongly typed RV32E register index.
//! 2. **Randomness:** A seeded, reproducible pseudo-random source.
//! 3. **Constants:** Fixed instruction encodings and register assignments.
//! 4. **Error Handling:** Typed errors for every stage and their exit codes.

/// Shared constants.
pub mod constants;

/// Error types and exit-code mapping.
pub mod error;

/// Register index newtype.
pub mod reg;

/// Seeded pseudo-random number generator.
pub mod rng;

pub use error::{BuildError, Error, ProgramError, Result};
pub use reg::Reg;
pub use rng::Rng;

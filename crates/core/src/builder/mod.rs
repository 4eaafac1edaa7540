//! Test-case construction.
//!
//! This module builds self-checking instruction sequences. It provides:
//! 1. **Cases:** [`TestCase`] and the [`Filler`] bodies branches and jumps nest.
//! 2. **Builder:** [`TestCaseBuilder`], which validates register use and computes expected results.
//! 3. **Model:** Operand aliasing, memory byte-lane extraction and loop trip simulation.
//! 4. **Layouts:** Rendering of each case kind into a linear listing.
//! 5. **Setup:** Constant materialisation, absolute loads/stores and result capture.

/// Test cases and fillers.
pub mod case;

/// Fluent test-case builder.
pub mod case_builder;

/// Rendering of cases into lines.
pub mod layout;

/// Expected-value model.
pub mod model;

/// Setup and capture sequences.
pub mod setup;

pub use case::{Filler, TestCase};
pub use case_builder::TestCaseBuilder;

use crate::config::{Endianness, MemoryConfig};

/// Memory-model parameters used while building cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Bits OR-ed into every load/store address.
    pub data_region: u32,
    /// Byte order of the data memory.
    pub endianness: Endianness,
    /// Upper bound on loop trip counts.
    pub max_loop_trips: u32,
}

impl BuildOptions {
    /// Extracts the build parameters from the memory configuration.
    pub const fn from_config(memory: &MemoryConfig) -> Self {
        Self {
            data_region: memory.data_region,
            endianness: memory.endianness,
            max_loop_trips: memory.max_loop_trips,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default())
    }
}

//! Test-suite orchestration.
//!
//! This module owns a run from generation to verdict. It provides:
//! 1. **Matrix:** Enumeration of the decode and core programs from the probe configuration.
//! 2. **Runner:** The decode and core passes over an [`Assembler`] and a [`Simulator`],
//!    with recovery listings on failure.
//!
//! Every random choice draws from one generator seeded by `general.seed`, so generating the
//! decode program and then the core program is reproducible for a given configuration.
//!
//! [`Assembler`]: crate::toolchain::Assembler
//! [`Simulator`]: crate::toolchain::Simulator

/// Decode and core matrix enumeration.
pub mod matrix;

/// Pass execution and verdicts.
pub mod runner;

pub use runner::Passes;

use crate::common::{ProgramError, Rng};
use crate::config::Config;
use crate::program::{DecodeProgram, Program};

/// A configured generation run.
#[derive(Debug)]
pub struct Suite {
    config: Config,
    rng: Rng,
}

impl Suite {
    /// Creates a run seeded from `config.general.seed`.
    pub const fn new(config: Config) -> Self {
        let rng = Rng::new(config.general.seed);
        Self { config, rng }
    }

    /// Configuration of the run.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Enumerates the decode-pass program.
    pub fn decode_program(&mut self) -> DecodeProgram {
        matrix::decode(&self.config.probes, &mut self.rng)
    }

    /// Enumerates and sequences the core-pass program.
    ///
    /// # Errors
    ///
    /// [`ProgramError`] when the listing has inconsistent labels or expected values.
    pub fn core_program(&mut self) -> Result<Program, ProgramError> {
        matrix::CoreMatrix::new(&self.config.probes, &self.config.memory, &mut self.rng).build()
    }
}

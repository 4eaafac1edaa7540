//! Pass execution.
//!
//! A pass generates its program, assembles it, simulates the resulting image and compares
//! the trace. The first failure ends the run; before returning it, the runner writes the
//! listing that produced it so the failure can be reproduced by hand:
//! - decode mismatches write the decode body, without padding, to `output.decode_dump`;
//! - every other failure after generation writes the full source to `output.core_dump`.
//!
//! On success the image file is removed.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use super::Suite;
use crate::common::{Error, Result};
use crate::stats::{PassReport, RunReport, Stage};
use crate::toolchain::{Assembler, Simulator};
use crate::verify;

/// Which passes run and against which testbench.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Passes {
    /// Run the decode pass before the core pass.
    pub decode: bool,
    /// Simulate the core-only testbench instead of the full-system one.
    pub core: bool,
}

/// Writes `listing` to `path` and hands back `err`.
///
/// A listing that cannot be written is logged; the original failure is what the caller sees.
fn dump(path: &Path, listing: &str, err: impl Into<Error>) -> Error {
    match fs::write(path, listing) {
        Ok(()) => info!(path = %path.display(), "listing written"),
        Err(e) => warn!(path = %path.display(), error = %e, "cannot write listing"),
    }
    err.into()
}

impl Suite {
    /// Runs the selected passes.
    ///
    /// # Errors
    ///
    /// The first failure, as an [`Error`] whose [`Error::exit_code`] classifies it.
    pub fn run<A, S>(&mut self, passes: Passes, assembler: &A, simulator: &S) -> Result<RunReport>
    where
        A: Assembler + ?Sized,
        S: Simulator + ?Sized,
    {
        let mut report = RunReport { seed: self.config.general.seed, ..RunReport::default() };
        if passes.decode {
            report.decode = Some(self.decode_pass(assembler, simulator)?);
        }
        report.core = self.core_pass(passes.core, assembler, simulator)?;

        fs::remove_file(&self.config.output.image).or_else(|e| match e.kind() {
            io::ErrorKind::NotFound => Ok(()),
            _ => Err(e),
        })?;
        info!(passed = report.passed(), "run complete");
        Ok(report)
    }

    fn write_image(&self, image: &[u8]) -> Result<()> {
        fs::write(&self.config.output.image, image)?;
        Ok(())
    }

    fn decode_pass<A, S>(&mut self, assembler: &A, simulator: &S) -> Result<PassReport>
    where
        A: Assembler + ?Sized,
        S: Simulator + ?Sized,
    {
        let mut pass = PassReport::default();
        let program = pass.time(Stage::Generate, || self.decode_program());
        pass.instructions = program.encoded().len();
        pass.expected = program.encoded().len();

        let padding = self.config.padding.decode;
        let source = program.source(padding);
        let out = &self.config.output;
        let image = pass
            .time(Stage::Assemble, || assembler.assemble(&source, padding))
            .map_err(|e| dump(&out.core_dump, &source, e))?;
        pass.image_bytes = image.len();
        self.write_image(&image)?;

        let sim = &self.config.simulator;
        let trace = pass
            .time(Stage::Simulate, || simulator.run(&sim.decode_testbench, &image, &sim.decode_sources))
            .map_err(|e| dump(&out.core_dump, &source, e))?;

        let check = self.config.general.check_encoding;
        pass.records = pass
            .time(Stage::Verify, || verify::decode::verify(&trace, program.encoded(), check))
            .map_err(|e| dump(&out.decode_dump, &program.body(), Error::Decode(e)))?;
        info!(records = pass.records, "decode pass complete");
        Ok(pass)
    }

    fn core_pass<A, S>(&mut self, core_only: bool, assembler: &A, simulator: &S) -> Result<PassReport>
    where
        A: Assembler + ?Sized,
        S: Simulator + ?Sized,
    {
        let mut pass = PassReport::default();
        let program = pass.time(Stage::Generate, || self.core_program())?;
        pass.instructions = program.lines().len();
        pass.expected = program.expected().len();

        let padding = self.config.padding.core;
        let source = program.source(padding);
        let out = &self.config.output;
        let image = pass
            .time(Stage::Assemble, || assembler.assemble(&source, padding))
            .map_err(|e| dump(&out.core_dump, &source, e))?;
        pass.image_bytes = image.len();
        self.write_image(&image)?;

        let sim = &self.config.simulator;
        let testbench = if core_only { &sim.core_testbench } else { &sim.top_testbench };
        let trace = pass
            .time(Stage::Simulate, || simulator.run(testbench, &image, &sim.core_sources))
            .map_err(|e| dump(&out.core_dump, &source, e))?;

        pass.records = pass
            .time(Stage::Verify, || verify::core::verify(&trace, program.expected()))
            .map_err(|e| dump(&out.core_dump, &source, Error::Core(e)))?;
        info!(records = pass.records, "core pass complete");
        Ok(pass)
    }
}

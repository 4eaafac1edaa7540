//! Run statistics collection and reporting.
//!
//! This module tracks what a run generated and checked. It provides:
//! 1. **Pass counters:** Instructions emitted, image size and trace records verified.
//! 2. **Stage timings:** Wall time spent generating, assembling, simulating and verifying.
//! 3. **Report:** A fixed-width text summary in the same layout for both passes.

use std::fmt;
use std::time::{Duration, Instant};

/// Pipeline stage of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Building the program listing.
    Generate,
    /// Running the cross assembler.
    Assemble,
    /// Running the testbench.
    Simulate,
    /// Comparing the trace.
    Verify,
}

/// Counters and timings of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Instructions (decode pass) or listing lines (core pass) emitted.
    pub instructions: usize,
    /// Expected outputs: decode tuples or output addresses.
    pub expected: usize,
    /// Size of the stripped image in bytes.
    pub image_bytes: usize,
    /// Trace records that matched.
    pub records: usize,
    /// Time spent building the listing.
    pub generate: Duration,
    /// Time spent in the assembler.
    pub assemble: Duration,
    /// Time spent in the simulator.
    pub simulate: Duration,
    /// Time spent comparing.
    pub verify: Duration,
}

impl PassReport {
    /// Runs `f`, charging its wall time to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let elapsed = start.elapsed();
        match stage {
            Stage::Generate => self.generate += elapsed,
            Stage::Assemble => self.assemble += elapsed,
            Stage::Simulate => self.simulate += elapsed,
            Stage::Verify => self.verify += elapsed,
        }
        out
    }

    /// Sum of all stage timings.
    pub fn total(&self) -> Duration {
        self.generate + self.assemble + self.simulate + self.verify
    }

    fn write_section(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        writeln!(f, "{name}")?;
        writeln!(f, "  instructions           {}", self.instructions)?;
        writeln!(f, "  expected               {}", self.expected)?;
        writeln!(f, "  image_bytes            {}", self.image_bytes)?;
        writeln!(f, "  records                {}", self.records)?;
        writeln!(f, "  time.generate          {:.4} s", self.generate.as_secs_f64())?;
        writeln!(f, "  time.assemble          {:.4} s", self.assemble.as_secs_f64())?;
        writeln!(f, "  time.simulate          {:.4} s", self.simulate.as_secs_f64())?;
        writeln!(f, "  time.verify            {:.4} s", self.verify.as_secs_f64())
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Seed the run was generated from.
    pub seed: u64,
    /// Decode pass, when it ran.
    pub decode: Option<PassReport>,
    /// Core pass.
    pub core: PassReport,
}

impl RunReport {
    /// Number of core results that matched, the count printed on success.
    pub const fn passed(&self) -> usize {
        self.core.records
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "RV32E TEST RUN STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "seed                     {:#018x}", self.seed)?;
        let total = self.decode.as_ref().map_or(Duration::ZERO, PassReport::total) + self.core.total();
        writeln!(f, "host_seconds             {:.4} s", total.as_secs_f64())?;
        writeln!(f, "----------------------------------------------------------")?;
        if let Some(decode) = &self.decode {
            decode.write_section(f, "DECODE PASS")?;
            writeln!(f, "----------------------------------------------------------")?;
        }
        self.core.write_section(f, "CORE PASS")?;
        write!(f, "==========================================================")
    }
}

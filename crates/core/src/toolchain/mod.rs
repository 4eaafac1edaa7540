//! External tool adapters.
//!
//! This module wraps the cross assembler and the HDL simulator behind two traits so the
//! pass runner can be driven by either the real tools or in-process doubles. It provides:
//! 1. **Assembler:** [`Assembler`] and the GCC-based [`GccToolchain`].
//! 2. **Simulator:** [`Simulator`] and the ModelSim-based [`ModelSim`].
//! 3. **Process Runner:** Command execution with captured output and bounded retries.

/// Assembly source to raw machine code.
pub mod assembler;

/// Testbench simulation.
pub mod simulator;

pub use assembler::{Assembler, GccToolchain};
pub use simulator::{ModelSim, Simulator};

use std::path::Path;
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::common::error::ToolchainError;

/// Retry policy shared by every tool invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Retry {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Delay before the first retry; attempt `n` waits `n` times as long.
    pub backoff: Duration,
}

impl Retry {
    /// Builds the policy from toolchain settings.
    pub const fn new(retries: u32, backoff_ms: u64) -> Self {
        Self { retries, backoff: Duration::from_millis(backoff_ms) }
    }
}

fn describe(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn run_once(cmd: &mut Command, tool: &str) -> Result<Output, ToolchainError> {
    let out = cmd
        .output()
        .map_err(|source| ToolchainError::Spawn { tool: tool.to_string(), source })?;
    if !out.status.success() {
        return Err(ToolchainError::Failed {
            tool: tool.to_string(),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        });
    }
    Ok(out)
}

/// Runs `program args..` in `cwd` and returns its captured output.
///
/// Non-zero exits and spawn failures are retried `retry.retries` times with a linearly
/// growing delay.
///
/// # Errors
///
/// The [`ToolchainError`] of the last attempt.
pub(crate) fn run(
    program: &Path,
    args: &[&str],
    cwd: &Path,
    retry: Retry,
) -> Result<Output, ToolchainError> {
    let tool = program.file_name().map_or_else(
        || program.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    );
    let mut attempt = 0;
    loop {
        let mut cmd = Command::new(program);
        let _ = cmd.args(args).current_dir(cwd);
        debug!(cmd = %describe(&cmd), attempt, "running");
        match run_once(&mut cmd, &tool) {
            Ok(out) => return Ok(out),
            Err(e) if attempt < retry.retries => {
                attempt += 1;
                warn!(%tool, attempt, error = %e, "tool failed, retrying");
                thread::sleep(retry.backoff * attempt);
            }
            Err(e) => return Err(e),
        }
    }
}

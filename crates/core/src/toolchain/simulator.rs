//! HDL simulator adapter.
//!
//! [`ModelSim`] compiles the design sources and a testbench into a scratch library and runs
//! the testbench in batch mode. The testbench reads the image from its working directory
//! under a fixed file name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{Retry, run};
use crate::common::error::ToolchainError;
use crate::config::{SimulatorConfig, ToolchainConfig};

/// Runs a testbench against a program image.
pub trait Simulator {
    /// Simulates `testbench` with `image` loaded and returns its standard output.
    ///
    /// # Arguments
    ///
    /// * `testbench` - Top-level testbench module, also the stem of its `.sv` file.
    /// * `image`     - Raw instruction image.
    /// * `sources`   - Design files compiled before the testbench, in order.
    ///
    /// # Errors
    ///
    /// [`ToolchainError`] when a file cannot be staged or a tool fails.
    fn run(&self, testbench: &str, image: &[u8], sources: &[String]) -> Result<String, ToolchainError>;
}

/// Mentor ModelSim / Questa driven through `vlib`, `vlog` and `vsim`.
#[derive(Clone, Debug)]
pub struct ModelSim {
    design_dir: PathBuf,
    image_name: PathBuf,
    retry: Retry,
}

impl ModelSim {
    /// Creates an adapter reading design files from `config.design_dir`.
    pub fn new(config: &SimulatorConfig, image_name: &Path, toolchain: &ToolchainConfig) -> Self {
        Self {
            design_dir: config.design_dir.clone(),
            image_name: image_name.file_name().map_or_else(|| image_name.to_path_buf(), PathBuf::from),
            retry: Retry::new(toolchain.retries, toolchain.backoff_ms),
        }
    }

    fn tool(name: &str) -> Result<PathBuf, ToolchainError> {
        which::which(name).map_err(|_| ToolchainError::NotFound { tool: name.to_string() })
    }

    fn stage(&self, dir: &Path, file: &str) -> Result<String, ToolchainError> {
        let _ = fs::copy(self.design_dir.join(file), dir.join(file))?;
        Ok(file.to_string())
    }
}

impl Simulator for ModelSim {
    fn run(&self, testbench: &str, image: &[u8], sources: &[String]) -> Result<String, ToolchainError> {
        let (vlib, vlog, vsim) = (Self::tool("vlib")?, Self::tool("vlog")?, Self::tool("vsim")?);
        let dir = tempfile::tempdir()?;
        let cwd = dir.path();

        fs::write(cwd.join(&self.image_name), image)?;
        let mut files = sources
            .iter()
            .map(|s| self.stage(cwd, s))
            .collect::<Result<Vec<_>, _>>()?;
        files.push(self.stage(cwd, &format!("{testbench}.sv"))?);

        let _ = run(&vlib, &["work"], cwd, self.retry)?;
        let mut args = vec!["-sv"];
        args.extend(files.iter().map(String::as_str));
        let _ = run(&vlog, &args, cwd, self.retry)?;

        info!(testbench, "simulating");
        let top = format!("work.{testbench}");
        let out = run(&vsim, &["-c", "-do", "run -all; quit", &top], cwd, self.retry)?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

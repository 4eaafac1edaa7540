//! Cross assembler adapter.
//!
//! [`GccToolchain`] drives `<prefix>gcc` to assemble and link a listing, then extracts the
//! `.text` section from the linked ELF. The no-op padding written around the body is
//! stripped from both ends of the image, leaving only the test body.

use std::fs;
use std::path::PathBuf;

use object::{Object, ObjectSection};
use tracing::{debug, info};

use super::{Retry, run};
use crate::common::constants::WORD_BYTES;
use crate::common::error::ToolchainError;
use crate::config::ToolchainConfig;

/// Turns assembly source into the raw machine code of its body.
pub trait Assembler {
    /// Assembles `source` and strips `padding` no-op words from each end of the image.
    ///
    /// # Errors
    ///
    /// [`ToolchainError`] when the tool fails or the image is shorter than the padding.
    fn assemble(&self, source: &str, padding: usize) -> Result<Vec<u8>, ToolchainError>;
}

/// Removes `padding` words from each end of `image`.
///
/// # Errors
///
/// [`ToolchainError::Padding`] when the image holds fewer than `2 * padding` words.
pub fn strip_padding(image: &[u8], padding: usize) -> Result<Vec<u8>, ToolchainError> {
    let pad = padding * WORD_BYTES as usize;
    if image.len() < 2 * pad {
        return Err(ToolchainError::Padding { len: image.len(), pad });
    }
    Ok(image[pad..image.len() - pad].to_vec())
}

/// Extracts the `.text` section of an ELF file.
///
/// # Errors
///
/// [`ToolchainError::Elf`] when the file does not parse or has no `.text`.
pub fn text_section(elf: &[u8]) -> Result<Vec<u8>, ToolchainError> {
    let file = object::File::parse(elf).map_err(|e| ToolchainError::Elf(e.to_string()))?;
    let section = file
        .section_by_name(".text")
        .ok_or_else(|| ToolchainError::Elf("no .text section".into()))?;
    let data = section.data().map_err(|e| ToolchainError::Elf(e.to_string()))?;
    Ok(data.to_vec())
}

/// RISC-V GCC cross toolchain.
#[derive(Clone, Debug)]
pub struct GccToolchain {
    gcc: PathBuf,
    march: String,
    mabi: String,
    retry: Retry,
}

impl GccToolchain {
    /// Locates `<prefix>gcc` on `PATH`, trying each configured prefix in order.
    ///
    /// # Errors
    ///
    /// [`ToolchainError::NotFound`] when no prefix yields an executable.
    pub fn discover(config: &ToolchainConfig) -> Result<Self, ToolchainError> {
        let gcc = config
            .prefixes
            .iter()
            .find_map(|p| which::which(format!("{p}gcc")).ok())
            .ok_or_else(|| ToolchainError::NotFound { tool: "gcc".into() })?;
        info!(gcc = %gcc.display(), "found cross toolchain");
        Ok(Self::with_compiler(gcc, config))
    }

    /// Uses `gcc` directly, skipping discovery.
    pub fn with_compiler(gcc: PathBuf, config: &ToolchainConfig) -> Self {
        Self {
            gcc,
            march: config.march.clone(),
            mabi: config.mabi.clone(),
            retry: Retry::new(config.retries, config.backoff_ms),
        }
    }
}

impl Assembler for GccToolchain {
    fn assemble(&self, source: &str, padding: usize) -> Result<Vec<u8>, ToolchainError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("prog.s"), source)?;
        let march = format!("-march={}", self.march);
        let mabi = format!("-mabi={}", self.mabi);
        let _ = run(
            &self.gcc,
            &[&march, &mabi, "-nostdlib", "-o", "prog.elf", "prog.s"],
            dir.path(),
            self.retry,
        )?;
        let elf = fs::read(dir.path().join("prog.elf"))?;
        let text = text_section(&elf)?;
        debug!(bytes = text.len(), padding, "assembled");
        strip_padding(&text, padding)
    }
}

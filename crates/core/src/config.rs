//! Configuration system for a generation run.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline probe sets, register sets, tool names and file names.
//! 2. **Structures:** Hierarchical config for probes, toolchain, padding, memory, simulator and output.
//! 3. **Loading:** JSON deserialization with per-field defaults and consistency checks.
//!
//! Every field is optional in JSON; use `Config::default()` for a run without a file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::Reg;
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Seed used when none is given.
    pub const SEED: u64 = 0x5256_3332_4500_0001;

    /// Operand magnitude seeds; `None` draws a fresh random value.
    pub const PROBE_VALUES: [Option<u32>; 6] =
        [Some(0x8000_0000), Some(0), Some(1), Some(0x7fff_ffff), Some(0xffff_ffff), None];

    /// Registers enumerated for every operand slot.
    pub const REGISTERS: [u8; 4] = [0, 2, 4, 15];

    /// Registers used as branch operands, disjoint from [`REGISTERS`].
    pub const BRANCH_REGISTERS: [u8; 3] = [7, 9, 11];

    /// Destination register of filler cases.
    pub const FILLER_RD: u8 = 3;

    /// Random pool instructions appended to each filler.
    pub const POOL_EXTRAS: usize = 3;

    /// Prefixes tried when looking up the cross toolchain.
    pub const PREFIXES: [&str; 3] =
        ["riscv-none-elf-", "riscv64-unknown-elf-", "riscv32-unknown-elf-"];

    /// Target architecture.
    pub const MARCH: &str = "rv32e";

    /// Target ABI.
    pub const MABI: &str = "ilp32e";

    /// Base delay between retries of a failed tool invocation.
    pub const BACKOFF_MS: u64 = 500;

    /// No-ops on each side of the decode-pass body.
    ///
    /// Keeps random branch and jump displacements inside the image.
    pub const DECODE_PADDING: usize = 1 << 20;

    /// No-ops on each side of the core-pass body.
    pub const CORE_PADDING: usize = 1;

    /// Base of the data region for load/store tests (upper quarter of the address space).
    pub const DATA_REGION: u32 = 0xC000_0000;

    /// Upper bound on generated loop trip counts.
    pub const MAX_LOOP_TRIPS: u32 = 64;

    /// Decoder testbench module.
    pub const DECODE_TESTBENCH: &str = "tb_decode";

    /// Core-only testbench module.
    pub const CORE_TESTBENCH: &str = "tb_core";

    /// Full-system testbench module.
    pub const TOP_TESTBENCH: &str = "tb_top";

    /// Design sources compiled for the decode pass.
    pub const DECODE_SOURCES: [&str; 3] =
        ["types.sv", "instruction_decoder.sv", "immediate_builder.sv"];

    /// Design sources compiled for the core pass, in compilation order.
    pub const CORE_SOURCES: [&str; 16] = [
        "definitions.vh",
        "types.sv",
        "pc_reg.v",
        "register_file.v",
        "instruction_decoder.sv",
        "immediate_builder.sv",
        "dependency_checker.sv",
        "compare.sv",
        "mux_3to1.sv",
        "alu.sv",
        "conv33.sv",
        "dsp.sv",
        "RV32E.sv",
        "instruction_cache_controller.sv",
        "top.sv",
        "MemorySlave.sv",
    ];

    /// Binary image consumed by the testbenches.
    pub const IMAGE: &str = "instructions.bin";

    /// Listing written on a decode mismatch.
    pub const DECODE_DUMP: &str = "tb_decode.s";

    /// Listing written on a toolchain failure or core mismatch.
    pub const CORE_DUMP: &str = "tb_top.s";
}

fn regs(indices: &[u8]) -> Vec<Reg> {
    indices.iter().filter_map(|&i| Reg::new(i)).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Byte order of the data memory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Endianness {
    /// Byte 0 is the least significant byte of a word.
    #[default]
    #[serde(alias = "little")]
    Little,
    /// Byte 0 is the most significant byte of a word.
    #[serde(alias = "big")]
    Big,
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Run-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Probe values and register sets.
    #[serde(default)]
    pub probes: ProbeConfig,
    /// Cross toolchain.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// No-op padding per pass.
    #[serde(default)]
    pub padding: PaddingConfig,
    /// Data memory model.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Hardware simulator.
    #[serde(default)]
    pub simulator: SimulatorConfig,
    /// Output file names.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the file cannot be read, parsed, or is inconsistent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.probes;
        if p.values.is_empty() {
            return Err(ConfigError::Invalid("probes.values is empty".into()));
        }
        if p.registers.iter().filter(|r| !r.is_zero()).count() < 2 {
            return Err(ConfigError::Invalid(
                "probes.registers needs at least two non-zero registers".into(),
            ));
        }
        if p.branch_registers.is_empty() {
            return Err(ConfigError::Invalid("probes.branch_registers is empty".into()));
        }
        let reserved = [Reg::ZERO, Reg::RA, Reg::SCRATCH, p.filler_rd];
        for r in p.registers.iter().filter(|r| !r.is_zero()) {
            if reserved.contains(r) || p.branch_registers.contains(r) {
                return Err(ConfigError::Invalid(format!(
                    "probe register {r} overlaps a reserved or branch register"
                )));
            }
        }
        for r in &p.branch_registers {
            if reserved.contains(r) {
                return Err(ConfigError::Invalid(format!("branch register {r} is reserved")));
            }
        }
        if p.filler_rd.is_zero() || p.filler_rd == Reg::RA || p.filler_rd == Reg::SCRATCH {
            return Err(ConfigError::Invalid(format!("filler_rd {} is reserved", p.filler_rd)));
        }
        if self.memory.max_loop_trips == 0 {
            return Err(ConfigError::Invalid("memory.max_loop_trips must be positive".into()));
        }
        Ok(())
    }
}

/// Run-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Seed of every random choice.
    #[serde(default = "GeneralConfig::default_seed")]
    pub seed: u64,
    /// Compare the instruction word column of the decode trace.
    #[serde(default = "GeneralConfig::default_check_encoding")]
    pub check_encoding: bool,
}

impl GeneralConfig {
    const fn default_seed() -> u64 {
        defaults::SEED
    }

    const fn default_check_encoding() -> bool {
        true
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { seed: Self::default_seed(), check_encoding: Self::default_check_encoding() }
    }
}

/// Probe values and register sets.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Operand seeds; `null` is a fresh random value per use.
    #[serde(default = "ProbeConfig::default_values")]
    pub values: Vec<Option<u32>>,
    /// Registers for rd, rs1 and rs2.
    #[serde(default = "ProbeConfig::default_registers")]
    pub registers: Vec<Reg>,
    /// Branch operand registers.
    #[serde(default = "ProbeConfig::default_branch_registers")]
    pub branch_registers: Vec<Reg>,
    /// Destination of filler cases.
    #[serde(default = "ProbeConfig::default_filler_rd")]
    pub filler_rd: Reg,
    /// Random pool instructions appended to each filler.
    #[serde(default = "ProbeConfig::default_pool_extras")]
    pub pool_extras: usize,
}

impl ProbeConfig {
    fn default_values() -> Vec<Option<u32>> {
        defaults::PROBE_VALUES.to_vec()
    }

    fn default_registers() -> Vec<Reg> {
        regs(&defaults::REGISTERS)
    }

    fn default_branch_registers() -> Vec<Reg> {
        regs(&defaults::BRANCH_REGISTERS)
    }

    fn default_filler_rd() -> Reg {
        Reg::new(defaults::FILLER_RD).unwrap_or(Reg::ZERO)
    }

    const fn default_pool_extras() -> usize {
        defaults::POOL_EXTRAS
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            values: Self::default_values(),
            registers: Self::default_registers(),
            branch_registers: Self::default_branch_registers(),
            filler_rd: Self::default_filler_rd(),
            pool_extras: Self::default_pool_extras(),
        }
    }
}

/// Cross toolchain settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainConfig {
    /// Tool prefixes tried in order.
    #[serde(default = "ToolchainConfig::default_prefixes")]
    pub prefixes: Vec<String>,
    /// `-march` value.
    #[serde(default = "ToolchainConfig::default_march")]
    pub march: String,
    /// `-mabi` value.
    #[serde(default = "ToolchainConfig::default_mabi")]
    pub mabi: String,
    /// Extra attempts after a failed tool invocation.
    #[serde(default)]
    pub retries: u32,
    /// Delay before the first retry; later retries wait proportionally longer.
    #[serde(default = "ToolchainConfig::default_backoff_ms")]
    pub backoff_ms: u64,
}

impl ToolchainConfig {
    fn default_prefixes() -> Vec<String> {
        strings(&defaults::PREFIXES)
    }

    fn default_march() -> String {
        defaults::MARCH.to_string()
    }

    fn default_mabi() -> String {
        defaults::MABI.to_string()
    }

    const fn default_backoff_ms() -> u64 {
        defaults::BACKOFF_MS
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            prefixes: Self::default_prefixes(),
            march: Self::default_march(),
            mabi: Self::default_mabi(),
            retries: 0,
            backoff_ms: Self::default_backoff_ms(),
        }
    }
}

/// No-op padding per pass.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaddingConfig {
    /// Decode pass.
    #[serde(default = "PaddingConfig::default_decode")]
    pub decode: usize,
    /// Core pass.
    #[serde(default = "PaddingConfig::default_core")]
    pub core: usize,
}

impl PaddingConfig {
    const fn default_decode() -> usize {
        defaults::DECODE_PADDING
    }

    const fn default_core() -> usize {
        defaults::CORE_PADDING
    }
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self { decode: Self::default_decode(), core: Self::default_core() }
    }
}

/// Data memory model.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MemoryConfig {
    /// Bits OR-ed into every load/store address.
    #[serde(default = "MemoryConfig::default_data_region")]
    pub data_region: u32,
    /// Byte order.
    #[serde(default)]
    pub endianness: Endianness,
    /// Address of the first result word minus 4.
    #[serde(default)]
    pub out_base: u32,
    /// Upper bound on loop trip counts.
    #[serde(default = "MemoryConfig::default_max_loop_trips")]
    pub max_loop_trips: u32,
}

impl MemoryConfig {
    const fn default_data_region() -> u32 {
        defaults::DATA_REGION
    }

    const fn default_max_loop_trips() -> u32 {
        defaults::MAX_LOOP_TRIPS
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_region: Self::default_data_region(),
            endianness: Endianness::default(),
            out_base: 0,
            max_loop_trips: Self::default_max_loop_trips(),
        }
    }
}

/// Hardware simulator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    /// Directory holding the design sources and testbenches.
    #[serde(default = "SimulatorConfig::default_design_dir")]
    pub design_dir: PathBuf,
    /// Decoder testbench.
    #[serde(default = "SimulatorConfig::default_decode_testbench")]
    pub decode_testbench: String,
    /// Core-only testbench.
    #[serde(default = "SimulatorConfig::default_core_testbench")]
    pub core_testbench: String,
    /// Full-system testbench.
    #[serde(default = "SimulatorConfig::default_top_testbench")]
    pub top_testbench: String,
    /// Decode-pass sources.
    #[serde(default = "SimulatorConfig::default_decode_sources")]
    pub decode_sources: Vec<String>,
    /// Core-pass sources.
    #[serde(default = "SimulatorConfig::default_core_sources")]
    pub core_sources: Vec<String>,
}

impl SimulatorConfig {
    fn default_design_dir() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_decode_testbench() -> String {
        defaults::DECODE_TESTBENCH.to_string()
    }

    fn default_core_testbench() -> String {
        defaults::CORE_TESTBENCH.to_string()
    }

    fn default_top_testbench() -> String {
        defaults::TOP_TESTBENCH.to_string()
    }

    fn default_decode_sources() -> Vec<String> {
        strings(&defaults::DECODE_SOURCES)
    }

    fn default_core_sources() -> Vec<String> {
        strings(&defaults::CORE_SOURCES)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            design_dir: Self::default_design_dir(),
            decode_testbench: Self::default_decode_testbench(),
            core_testbench: Self::default_core_testbench(),
            top_testbench: Self::default_top_testbench(),
            decode_sources: Self::default_decode_sources(),
            core_sources: Self::default_core_sources(),
        }
    }
}

/// Output file names.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Binary image written for the testbench.
    #[serde(default = "OutputConfig::default_image")]
    pub image: PathBuf,
    /// Recovery listing for decode mismatches.
    #[serde(default = "OutputConfig::default_decode_dump")]
    pub decode_dump: PathBuf,
    /// Recovery listing for toolchain failures and core mismatches.
    #[serde(default = "OutputConfig::default_core_dump")]
    pub core_dump: PathBuf,
}

impl OutputConfig {
    fn default_image() -> PathBuf {
        PathBuf::from(defaults::IMAGE)
    }

    fn default_decode_dump() -> PathBuf {
        PathBuf::from(defaults::DECODE_DUMP)
    }

    fn default_core_dump() -> PathBuf {
        PathBuf::from(defaults::CORE_DUMP)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image: Self::default_image(),
            decode_dump: Self::default_decode_dump(),
            core_dump: Self::default_core_dump(),
        }
    }
}

//! Error definitions.
//!
//! This module defines the error taxonomy of a generation run. It provides:
//! 1. **Build Errors:** Invalid test-case construction rejected before rendering.
//! 2. **Program Errors:** Label and dedup-cache consistency failures.
//! 3. **Toolchain Errors:** External assembler and simulator failures.
//! 4. **Verification Errors:** Trace grammar violations and first-mismatch reports.
//! 5. **Exit Codes:** The mapping from failures to the process exit status.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::reg::Reg;
use crate::isa::Mnemonic;

/// Result alias over the top-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A test case that cannot be constructed as requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Memory accesses need a non-zero base register to hold the address.
    #[error("{mnemonic}: base register must not be x0")]
    ZeroBase {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
    },

    /// The base register would overwrite the data register during setup.
    #[error("{mnemonic}: base register {reg} aliases the data register")]
    BaseAliasesData {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Offending register.
        reg: Reg,
    },

    /// The scratch register is reserved for address materialisation.
    #[error("{mnemonic}: {reg} is reserved as scratch and cannot be {role}")]
    ScratchRegister {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Offending register.
        reg: Reg,
        /// Operand slot that used it.
        role: &'static str,
    },

    /// A branch or jump was built without the fillers it needs.
    #[error("{mnemonic}: missing {slot} filler")]
    MissingFiller {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Which filler slot is empty.
        slot: &'static str,
    },

    /// Branch bodies must be nested test cases so their results are known.
    #[error("{mnemonic}: branch fillers must be nested test cases")]
    FlatBranchFiller {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
    },

    /// Both branch bodies must write the destination register of the branch case.
    #[error("{mnemonic}: filler writes {found}, expected {expected}")]
    FillerDestination {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Destination of the branch case.
        expected: Reg,
        /// Destination of the filler.
        found: Reg,
    },

    /// A filler writes a register the surrounding control flow depends on.
    #[error("{mnemonic}: filler clobbers {reg}")]
    FillerClobbers {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Clobbered register.
        reg: Reg,
    },

    /// Forward branches cannot form a loop.
    #[error("{mnemonic}: a forward branch cannot be a loop")]
    ForwardLoop {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
    },

    /// The loop would not exit within the configured number of trips.
    #[error("{mnemonic}: loop does not exit within {bound} trips")]
    LoopDiverges {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Trip bound.
        bound: u32,
    },

    /// Jumps link through the return-address register.
    #[error("{mnemonic}: destination must be {}, got {found}", Reg::RA)]
    JumpDestination {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Requested destination.
        found: Reg,
    },

    /// The register used to correct the link value is unusable.
    #[error("{mnemonic}: {reg} cannot hold the link address")]
    LinkRegister {
        /// Mnemonic under test.
        mnemonic: Mnemonic,
        /// Offending register.
        reg: Reg,
    },

    /// A callee cannot itself call or write the return-address register.
    #[error("callee {mnemonic} at {addr} would overwrite the return address")]
    CalleeClobbersReturn {
        /// Mnemonic of the callee case.
        mnemonic: Mnemonic,
        /// Output address of the callee.
        addr: u32,
    },

    /// Only leaf cases can be inlined into a branch body or called.
    #[error("{mnemonic} case at {addr} cannot be used as a filler")]
    NotInlinable {
        /// Mnemonic of the rejected filler.
        mnemonic: Mnemonic,
        /// Output address of the rejected filler.
        addr: u32,
    },
}

/// A program listing that would not assemble or would verify ambiguously.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Label defined more than once.
    #[error("label .{0} defined more than once")]
    DuplicateLabel(String),

    /// Label referenced but never defined.
    #[error("label .{0} is referenced but never defined")]
    UndefinedLabel(String),

    /// A callee was already rendered inline, without its return sequence.
    #[error("address {0} was rendered inline and cannot be called")]
    NotCallable(u32),

    /// Two cases share an output address but expect different results.
    #[error("address {addr}: expected {first} and {second}")]
    ConflictingExpected {
        /// Output address.
        addr: u32,
        /// Value recorded first.
        first: i32,
        /// Conflicting value.
        second: i32,
    },
}

/// Failure of an external tool invocation.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// No executable with any configured prefix is on `PATH`.
    #[error("{tool}: not found on PATH")]
    NotFound {
        /// Tool name without prefix.
        tool: String,
    },

    /// The process could not be started.
    #[error("{tool}: failed to start")]
    Spawn {
        /// Executable that failed.
        tool: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("{tool}: exited with {status}\n{stderr}")]
    Failed {
        /// Executable that failed.
        tool: String,
        /// Rendered exit status.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The linked image could not be read.
    #[error("malformed ELF: {0}")]
    Elf(String),

    /// More padding was requested than the image contains.
    #[error("image is {len} bytes, cannot strip {pad} bytes from each end")]
    Padding {
        /// Image length in bytes.
        len: usize,
        /// Bytes to strip from each end.
        pad: usize,
    },

    /// Temporary-directory or file I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A trace line that looks like a record but does not parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("trace line {line_no}: {reason}: {line:?}")]
pub struct ParseError {
    /// One-based line number in the trace.
    pub line_no: usize,
    /// Offending line.
    pub line: String,
    /// What is wrong with it.
    pub reason: String,
}

/// First discrepancy between a trace and the expected outputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// A decode field disagrees with the expected signal.
    #[error("{encoding} ({index}): {field}={actual}, expected {expected}")]
    DecodeMismatch {
        /// Hex encoding reported by the trace.
        encoding: String,
        /// Zero-based emission index.
        index: usize,
        /// Field name.
        field: &'static str,
        /// Value reported by the trace.
        actual: String,
        /// Expected value.
        expected: i64,
    },

    /// The instruction word reported by the trace differs from the expected encoding.
    #[error("{actual:08x} ({index}): encoding, expected {expected:08x}")]
    EncodingMismatch {
        /// Zero-based emission index.
        index: usize,
        /// Word reported by the trace.
        actual: u32,
        /// Expected word.
        expected: u32,
    },

    /// A core result disagrees with the expected value, or its address was never expected.
    #[error("{address}: {actual}!={}", .expected.map_or_else(|| "<none>".to_string(), |e| e.to_string()))]
    CoreMismatch {
        /// Output address.
        address: u32,
        /// Value reported by the trace.
        actual: i64,
        /// Expected value, if the address is known.
        expected: Option<i32>,
    },

    /// The trace holds more decode records than instructions were emitted.
    #[error("unexpected decode record {index}")]
    ExtraRecord {
        /// Zero-based index of the extra record.
        index: usize,
    },

    /// The trace ended before every expected output was seen.
    #[error("trace incomplete: {found} of {expected} expected outputs seen, first missing {first_missing}")]
    Incomplete {
        /// Number of expected outputs.
        expected: usize,
        /// Number seen.
        found: usize,
        /// Index or address of the first missing output.
        first_missing: u32,
    },

    /// The trace violated the record grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}", path.display())]
    Read {
        /// Configuration path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("cannot parse {}", path.display())]
    Parse {
        /// Configuration path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The values are individually valid but inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error of a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Test case construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Program listing is inconsistent.
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// External tool failed.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// File I/O outside the toolchain failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Decode pass found a mismatch.
    #[error("decode pass: {0}")]
    Decode(#[source] VerifyError),

    /// Core pass found a mismatch.
    #[error("core pass: {0}")]
    Core(#[source] VerifyError),
}

impl Error {
    /// Process exit status for this failure.
    ///
    /// # Returns
    ///
    /// `2` for decode mismatches, `3` for core mismatches and `1` for everything else.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Decode(_) => 2,
            Self::Core(_) => 3,
            Self::Build(_) | Self::Program(_) | Self::Toolchain(_) | Self::Config(_) | Self::Io(_) => 1,
        }
    }
}

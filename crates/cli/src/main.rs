//! RV32E test-vector generator and verifier CLI.
//!
//! This binary runs one verification job against an RV32E design. It performs:
//! 1. **Decode pass (optional):** Assemble every encodable instruction and check the decoder trace.
//! 2. **Core pass:** Assemble self-checking programs and check every captured result.
//!
//! Exit status: `0` all passed, `1` toolchain or setup failure, `2` decode mismatch,
//! `3` core mismatch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use rvtest_core::stats::RunReport;
use rvtest_core::suite::Passes;
use rvtest_core::toolchain::{GccToolchain, ModelSim};
use rvtest_core::{Config, Error, Suite};

#[derive(Parser, Debug)]
#[command(
    name = "rvtest",
    author,
    version,
    about = "RV32E test-vector generator and trace verifier",
    long_about = "Generate self-checking RV32E programs, run them through a cross assembler and an HDL \
                  simulator, and compare the simulator trace with the expected results.\n\n\
                  Examples:\n  rvtest --decode\n  rvtest --core --seed 42 --design-dir rtl/\n  \
                  rvtest --config run.json -v"
)]
struct Cli {
    /// Run the decode pass before the core pass.
    #[arg(long)]
    decode: bool,

    /// Simulate the core-only testbench instead of the full-system one.
    #[arg(long)]
    core: bool,

    /// Seed for every random choice (overrides the configuration file).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file; built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the design sources and testbenches.
    #[arg(long)]
    design_dir: Option<PathBuf>,

    /// Print the run statistics on success.
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: &Cli) -> Result<RunReport, Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.general.seed = seed;
    }
    if let Some(dir) = &cli.design_dir {
        config.simulator.design_dir.clone_from(dir);
    }
    config.validate()?;

    let assembler = GccToolchain::discover(&config.toolchain)?;
    let simulator = ModelSim::new(&config.simulator, &config.output.image, &config.toolchain);
    let passes = Passes { decode: cli.decode, core: cli.core };
    Suite::new(config).run(passes, &assembler, &simulator)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            if cli.stats {
                eprintln!("{report}");
            }
            println!("All tests passed ({})", report.passed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            match &e {
                Error::Decode(mismatch) | Error::Core(mismatch) => println!("{mismatch}"),
                _ => error!("{e}"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

//! boundsafe
//!
//! Echoes its arguments, then writes past the end of a one-element array
//! through the selected access mode and prints what happened.
//!
//! # Usage
//!
//! ```bash
//! # Checked write at index 3 (prints the out-of-range diagnostic)
//! boundsafe a "b c"
//!
//! # Same write through `IndexMut` (panics)
//! boundsafe --access panicking
//!
//! # Hammer the checked accessors with random indices
//! boundsafe probe --trials 100000 --capacity 16
//! ```

use std::ffi::OsString;
use std::io::{stdout, Write};
use std::num::ParseIntError;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use boundsafe::demo::{Access, Demo, ORIGINAL_INDEX, ORIGINAL_VALUE};
use boundsafe::echo::{echo_args, lossy_args};
use boundsafe::probe::{self, ProbeConfig};

#[derive(Parser)]
#[command(name = "boundsafe")]
#[command(version)]
#[command(about = "Checked and unchecked access to a fixed-size array")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    demo: DemoArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run random checked reads and writes and report contract violations
    Probe(ProbeArgs),
}

#[derive(Args)]
struct DemoArgs {
    /// How the out-of-range write is performed
    #[arg(short, long, value_enum, default_value_t = Access::Checked)]
    access: Access,

    /// Index to write to
    #[arg(short, long, default_value_t = ORIGINAL_INDEX, allow_negative_numbers = true)]
    index: i128,

    /// Value to write (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_value, default_value_t = ORIGINAL_VALUE)]
    value: u64,

    /// Let unchecked access proceed out of range (undefined behaviour)
    #[arg(long)]
    allow_undefined: bool,

    /// Extra arguments; echoed with the rest of the command line
    #[arg(value_name = "ARGS")]
    args: Vec<OsString>,
}

#[derive(Args)]
struct ProbeArgs {
    /// Total number of random accesses
    #[arg(short, long, default_value_t = ProbeConfig::default().trials)]
    trials: usize,

    /// How far outside the valid range indices are drawn
    #[arg(short, long, default_value_t = ProbeConfig::default().span)]
    span: u32,

    /// Seed for the random generator
    #[arg(long, default_value_t = ProbeConfig::default().seed)]
    seed: u64,

    /// Number of independent batches run in parallel
    #[arg(short, long, default_value_t = ProbeConfig::default().batches)]
    batches: usize,

    /// Array length to probe (1, 4, 16 or 64)
    #[arg(short, long, default_value_t = 4)]
    capacity: usize,
}

fn parse_value(s: &str) -> Result<u64, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Some(Commands::Probe(args)) => handle_probe(args),
        None => handle_demo(cli.demo),
    }
}

fn handle_demo(args: DemoArgs) -> Result<()> {
    let mut out = stdout().lock();
    echo_args(&mut out, &lossy_args(std::env::args_os())).context("failed to echo arguments")?;
    let demo = Demo {
        access: args.access,
        index: args.index,
        value: args.value,
        allow_undefined: args.allow_undefined,
    };
    demo.run(&mut out)?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn handle_probe(args: ProbeArgs) -> Result<()> {
    let config = ProbeConfig {
        trials: args.trials,
        span: args.span,
        seed: args.seed,
        batches: args.batches,
    };
    info!(
        "probing length {} array with {} trials in {} batches",
        args.capacity, config.trials, config.batches
    );
    let report = probe::run_with_capacity(args.capacity, &config)?;
    println!("{report}");
    if report.violations > 0 {
        bail!("{} contract violations found", report.violations);
    }
    Ok(())
}

//! Command-line interface definitions for ssdtgen.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build ACPI SSDT tables from TOML device descriptions.
#[derive(Parser)]
#[command(name = "ssdtgen", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Serialize the described table to an AML file.
    Build(BuildArgs),
    /// Print the size in bytes of the described table.
    Size(SizeArgs),
    /// Verify the length and checksum of an existing table.
    Check(CheckArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Parser)]
pub struct BuildArgs {
    /// Table description (TOML).
    pub config: PathBuf,

    /// Output file for the finished table.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

/// Arguments for the `size` subcommand.
#[derive(Parser)]
pub struct SizeArgs {
    /// Table description (TOML).
    pub config: PathBuf,
}

/// Arguments for the `check` subcommand.
#[derive(Parser)]
pub struct CheckArgs {
    /// Binary table to verify.
    pub table: PathBuf,
}

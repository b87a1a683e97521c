//! ssdtgen: build ACPI SSDT tables from TOML device descriptions.
//!
//! Pipeline: parse description → build AML tree → query size → allocate →
//!           serialize → write.

mod cli;
mod config;
mod generate;

use std::path::Path;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use hadron_amlgen::{TableHeader, serialize_tree, validate_checksum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        cli::Command::Build(ref args) => cmd_build(&args.config, &args.output),
        cli::Command::Size(ref args) => cmd_size(&args.config),
        cli::Command::Check(ref args) => cmd_check(&args.table),
    }
}

/// Installs the tracing subscriber. `RUST_LOG` takes precedence over
/// `--verbose`; library `log` records are forwarded through it.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn cmd_build(config_path: &Path, output: &Path) -> Result<()> {
    let config = config::load_config(config_path)?;
    let tree = generate::build_tree(&config)?;

    let required = serialize_tree(&tree, None).context("failed to size table")?;
    let mut table = vec![0u8; required as usize];
    let written = serialize_tree(&tree, Some(&mut table)).context("failed to serialize table")?;
    ensure!(written == required, "serializer wrote {written} bytes, expected {required}");

    std::fs::write(output, &table)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        bytes = required,
        checksum = table[TableHeader::CHECKSUM_OFFSET],
        "wrote {}",
        output.display()
    );
    Ok(())
}

fn cmd_size(config_path: &Path) -> Result<()> {
    let config = config::load_config(config_path)?;
    let tree = generate::build_tree(&config)?;
    let required = serialize_tree(&tree, None).context("failed to size table")?;
    println!("{required}");
    Ok(())
}

fn cmd_check(table_path: &Path) -> Result<()> {
    let table = std::fs::read(table_path)
        .with_context(|| format!("failed to read {}", table_path.display()))?;
    check_table(&table)?;
    let header = TableHeader::read_from_bytes(&table).context("table shorter than its header")?;
    println!(
        "{}: {} bytes, revision {}, checksum ok",
        String::from_utf8_lossy(&header.signature),
        header.length,
        header.revision
    );
    Ok(())
}

/// Verifies that the header length matches the table size and that the
/// table bytes sum to zero.
fn check_table(table: &[u8]) -> Result<()> {
    let header = TableHeader::read_from_bytes(table).context("table shorter than its header")?;
    ensure!(
        header.length as usize == table.len(),
        "header length {} does not match table size {}",
        header.length,
        table.len()
    );
    ensure!(validate_checksum(table), "checksum does not sum to zero");
    tracing::debug!(signature = %String::from_utf8_lossy(&header.signature), "table verified");
    Ok(())
}

//! mi-dump
//!
//! Parses GDB/MI output and prints every record back as normalized GDB/MI
//! text or JSON. Handy for inspecting what a frontend receives from GDB.
//!
//! Usage:
//!   gdb --interpreter=mi2 -batch -ex run ./a.out | mi-dump --format json
//!   mi-dump --format pretty session.log

use anyhow::{Context, Result};
use clap::Parser;
use gdb_mi::dump::{dump_records, DumpConfig, OutputFormat};
use gdb_mi::gdb::{ParserConfig, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Nesting is parsed recursively, so the depth limit stays well inside the main thread's stack
const MAX_DEPTH_CEILING: u64 = 4096;

#[derive(Debug, Parser)]
#[command(name = "mi-dump", version, about = "Parse and re-emit GDB/MI output")]
struct Args {
    /// Transcript to read; stdin when omitted
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Deepest tuple/list nesting accepted
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH as u64, value_parser = clap::value_parser!(u64).range(32..=MAX_DEPTH_CEILING))]
    max_depth: u64,

    /// Abort on the first line that fails to parse
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = DumpConfig {
        format: args.format,
        parser: ParserConfig {
            max_depth: usize::try_from(args.max_depth).unwrap_or(usize::MAX),
        },
        strict: args.strict,
    };

    let mut stdout = tokio::io::stdout();
    let stats = match &args.input {
        Some(path) => {
            info!("Reading GDB/MI output from {}", path.display());
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            dump_records(BufReader::new(file), &mut stdout, &config).await?
        }
        None => {
            info!("Reading GDB/MI output from stdin");
            dump_records(BufReader::new(tokio::io::stdin()), &mut stdout, &config).await?
        }
    };

    info!(
        "Parsed {} records ({} skipped, {} failed)",
        stats.records, stats.skipped, stats.failed
    );
    Ok(())
}

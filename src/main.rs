use std::{
    io::{self, IsTerminal},
    num::NonZeroUsize,
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use device_stats::{config::default_workers, Config, OutputOrder, YearMonth};

#[derive(Parser)]
#[command(name = "device-stats")]
#[command(author, version, about = "Monthly min/mean/max per device sensor", long_about = None)]
struct Cli {
    /// Input file with `|`-delimited device readings
    #[arg(default_value = "devices.csv")]
    input: PathBuf,

    /// Output report file
    #[arg(short, long, default_value = "resumo.csv")]
    output: PathBuf,

    /// Number of worker threads (defaults to the available parallelism)
    #[arg(short, long, env = "DEVICE_STATS_WORKERS")]
    workers: Option<NonZeroUsize>,

    /// Ignore records dated before this month (YYYY-MM)
    #[arg(long, default_value_t = YearMonth::default())]
    since: YearMonth,

    /// Sort report rows by device, month and sensor
    #[arg(long)]
    sort: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let config = Config {
        input: cli.input,
        output: cli.output,
        workers: cli.workers.unwrap_or_else(default_workers),
        since: cli.since,
        order: if cli.sort {
            OutputOrder::Sorted
        } else {
            OutputOrder::Insertion
        },
        echo: !cli.quiet,
    };

    let summary = device_stats::run(&config)?;
    tracing::debug!(?summary, "job finished");
    Ok(())
}

//! Generate a synthetic `devices.csv` for benchmarking and manual runs

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Typical (base, spread) per sensor channel
const CHANNELS: [(f64, f64); 6] = [
    (22.0, 6.0),
    (50.0, 20.0),
    (300.0, 250.0),
    (40.0, 15.0),
    (600.0, 300.0),
    (50.0, 40.0),
];

#[derive(Parser)]
#[command(about = "Generate synthetic device readings")]
struct Args {
    /// Number of data lines to write
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    rows: usize,

    /// Number of distinct devices
    #[arg(short, long, default_value_t = 100)]
    devices: usize,

    /// Fraction of lines missing their last sensor value
    #[arg(long, default_value_t = 0.0)]
    malformed: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long, default_value = "devices.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let file = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "id|device|contagem|data|temperatura|umidade|luminosidade|ruido|eco2|etvoc"
    )?;
    for id in 0..args.rows {
        let device = rng.gen_range(0..args.devices.max(1));
        let year = rng.gen_range(2023..=2025);
        let month = rng.gen_range(1..=12);
        let day = rng.gen_range(1..=28);
        write!(
            w,
            "{}|device-{:03}|{}|{:04}-{:02}-{:02} {:02}:{:02}:00",
            id,
            device,
            id % 1000,
            year,
            month,
            day,
            rng.gen_range(0..24),
            rng.gen_range(0..60)
        )?;
        let channels = if rng.gen_bool(args.malformed.clamp(0.0, 1.0)) {
            &CHANNELS[..CHANNELS.len() - 1]
        } else {
            &CHANNELS[..]
        };
        for &(base, spread) in channels {
            write!(w, "|{:.2}", base + rng.gen_range(-spread..spread))?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

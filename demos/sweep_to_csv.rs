//! Example: Write a synthetic sweep to CSV
//!
//! Generates a few signals for the chosen analysis and writes them through
//! the CSV waveform format.
//!
//! Usage:
//!   cargo run --example sweep_to_csv -- \
//!       --dir /tmp --name rc_filter --analysis tran \
//!       --points 200 --signals 3
//!
//! AC sweep (complex values):
//!   cargo run --example sweep_to_csv -- --dir /tmp --name bode --analysis ac

use clap::{Parser, ValueEnum};
use std::f64::consts::PI;
use tracing::info;
use wavecsv::table::diagnostics;
use wavecsv::{
    Analysis, CsvFormat, FileSink, Logic, ModePolicy, Setup, WaveDefinition, WaveformFormat,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AnalysisArg {
    Tran,
    Ac,
    Dc,
    /// Digital transient (logic values)
    Logic,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    dir: String,

    /// File name without the .csv extension
    #[arg(short, long, default_value = "sweep")]
    name: String,

    /// Analysis to simulate
    #[arg(short, long, value_enum, default_value = "tran")]
    analysis: AnalysisArg,

    /// Number of sweep points
    #[arg(short, long, default_value = "100")]
    points: usize,

    /// Number of signal columns
    #[arg(short, long, default_value = "2")]
    signals: usize,

    /// Reject mixed sample encodings within one flush
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let analysis = match args.analysis {
        AnalysisArg::Tran | AnalysisArg::Logic => Analysis::Transient,
        AnalysisArg::Ac => Analysis::Ac,
        AnalysisArg::Dc => Analysis::Dc,
    };
    let policy = if args.strict {
        ModePolicy::Strict
    } else {
        ModePolicy::LastWriteWins
    };

    info!("=== Sweep to CSV ===");
    info!(
        "{:?}: {} points x {} signals -> {}/{}.csv",
        args.analysis, args.points, args.signals, args.dir, args.name
    );

    let (reporter, diagnostics_rx) = diagnostics::channel(64);
    let mut csv = CsvFormat::new(FileSink::new())
        .with_mode_policy(policy)
        .with_diagnostics(reporter);

    csv.open(&Setup::new(&args.dir, &args.name, analysis))?;

    let mut handles = Vec::with_capacity(args.signals);
    for i in 0..args.signals {
        let definition = WaveDefinition::new(format!("v{}", i)).with_scope(["top", "dut"]);
        handles.push(csv.define(&definition)?);
    }

    for step in 0..args.points {
        let x = step as f64;
        for (i, handle) in handles.iter().enumerate() {
            let k = (i + 1) as f64;
            match args.analysis {
                AnalysisArg::Tran => {
                    let t = x * 1e-6;
                    csv.add_analog_point(*handle, (2.0 * PI * k * 1e4 * t).sin(), t)?;
                }
                AnalysisArg::Ac => {
                    // Single-pole low-pass response per signal
                    let f = 10f64.powf(x / 20.0);
                    let w = f / (1e3 * k);
                    let denom = 1.0 + w * w;
                    csv.add_analog_complex_point(*handle, 1.0 / denom, -w / denom, f)?;
                }
                AnalysisArg::Dc => {
                    let v = x * 0.05;
                    csv.add_analog_point(*handle, v * k, v)?;
                }
                AnalysisArg::Logic => {
                    let level = if (step >> (i % 32)) & 1 == 1 {
                        Logic::One
                    } else {
                        Logic::Zero
                    };
                    csv.add_digital_point(*handle, level, x * 1e-9)?;
                }
            }
        }
    }

    csv.flush()?;
    csv.close()?;

    let reported = diagnostics_rx.try_iter().count();
    if reported > 0 {
        info!("{} diagnostics reported", reported);
    }

    info!("Done!");

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use pocketdash::{InjectedFault, SimOptions};

/// Run the PocketDash firmware on a simulated board.
#[derive(Parser, Debug)]
#[command(name = "pocketdash-sim", version)]
struct Args {
    /// Number of memory regions to test (1 or 2).
    #[arg(long, default_value_t = 1)]
    regions: usize,

    /// Size of each region in KiB.
    #[arg(long, default_value_t = 1024)]
    region_kib: u32,

    /// Words tested per region per frame.
    #[arg(long, default_value_t = 1024)]
    chunk_words: u32,

    /// Stop after this many frames instead of running to completion.
    #[arg(long)]
    frames: Option<u32>,

    /// Corrupt reads of a word: ADDR:XORMASK, hex with 0x or decimal.
    #[arg(long = "fault", value_name = "ADDR:XORMASK")]
    faults: Vec<InjectedFault>,

    /// FB_SWAP polls before the simulated controller acknowledges.
    #[arg(long, default_value_t = 0)]
    swap_latency: u32,

    /// Save the final presented frame as a PNG.
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,

    /// Firmware log level.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn stderr_sink(line: &str) {
    eprintln!("{}", line);
}

fn main() -> Result<()> {
    let args = Args::parse();

    firmware::logger::init(args.log_level).context("logger already installed")?;
    firmware::logger::attach_sink(stderr_sink);

    let options = SimOptions {
        regions: args.regions,
        region_bytes: args
            .region_kib
            .checked_mul(1024)
            .context("region size does not fit in 32 bits")?,
        chunk_words: args.chunk_words,
        frames: args.frames,
        faults: args.faults,
        swap_latency: args.swap_latency,
        screenshot: args.screenshot,
    };

    let report = pocketdash::run(&options)?;

    println!(
        "frames: {}  swaps: {}  cpu self-test: {}/{}",
        report.frames, report.swaps, report.self_test_passed, report.self_test_total
    );
    for region in &report.regions {
        let status = if region.progress < 100 {
            "TESTING"
        } else if region.errors == 0 {
            "PASSED"
        } else {
            "FAILED"
        };
        println!(
            "{:<18} {:#010x}  {:>3}%  {:>5} KiB  errors {:>6}  phase {:<12}  {}",
            region.title,
            region.base,
            region.progress,
            region.tested_kib,
            region.errors,
            region.phase.name(),
            status
        );
    }
    Ok(())
}

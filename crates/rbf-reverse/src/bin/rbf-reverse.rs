use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

/// Convert a Quartus .rbf into the bit-reversed .rbf_r the Pocket loads.
#[derive(Parser, Debug)]
#[command(name = "rbf-reverse", version)]
struct Args {
    /// Input bitstream (.rbf).
    input: PathBuf,
    /// Output file (.rbf_r).
    output: PathBuf,
}

fn main() -> Result<()> {
    // Usage errors exit 1 like any other failure; --help and --version exit 0.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    let bytes = rbf_reverse::convert(&args.input, &args.output)?;
    println!(
        "Successfully converted {} to {} ({} bytes)",
        args.input.display(),
        args.output.display(),
        bytes
    );
    Ok(())
}

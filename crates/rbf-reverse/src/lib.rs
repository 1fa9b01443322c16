//! RBF to RBF_R conversion.
//!
//! The Pocket's FPGA loader expects each byte of a Quartus raw bitstream with
//! its bit order reversed: bit 7 becomes bit 0 and so on. Nothing else about
//! the file changes, so conversion is a byte-for-byte stream.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Reverse the bit order of one byte.
pub const fn reverse_byte(b: u8) -> u8 {
    b.reverse_bits()
}

/// Copy `input` to `output`, reversing every byte. Returns the byte count.
pub fn reverse_stream(input: &mut impl Read, output: &mut impl Write) -> io::Result<u64> {
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        for b in &mut buf[..n] {
            *b = reverse_byte(*b);
        }
        output.write_all(&buf[..n])?;
        total += n as u64;
    }
    output.flush()?;
    Ok(total)
}

/// Convert the file at `input` into `output`.
///
/// Both files are opened before any data moves; failing to open either one
/// is reported without touching the other's contents.
pub fn convert(input: &Path, output: &Path) -> Result<u64> {
    let src = File::open(input)
        .with_context(|| format!("cannot open input file '{}'", input.display()))?;
    let dst = File::create(output)
        .with_context(|| format!("cannot create output file '{}'", output.display()))?;

    let mut reader = BufReader::new(src);
    let mut writer = BufWriter::new(dst);
    reverse_stream(&mut reader, &mut writer).with_context(|| {
        format!(
            "failed converting '{}' to '{}'",
            input.display(),
            output.display()
        )
    })
}

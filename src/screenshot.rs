//! PNG export of an RGB565 surface.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use firmware::graphics::Color;

/// Save `pixels` (row-major RGB565) as an 8-bit RGB PNG.
pub fn save_png(path: &Path, pixels: &[u16], width: usize, height: usize) -> Result<()> {
    ensure!(
        pixels.len() >= width * height,
        "surface holds {} pixels, {}x{} needs {}",
        pixels.len(),
        width,
        height,
        width * height
    );

    let file = fs::File::create(path)
        .with_context(|| format!("cannot create screenshot '{}'", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgb = Vec::with_capacity(width * height * 3);
    for &px in &pixels[..width * height] {
        rgb.extend_from_slice(&Color(px).to_rgb888());
    }
    writer.write_image_data(&rgb)?;
    writer.finish()?;
    Ok(())
}

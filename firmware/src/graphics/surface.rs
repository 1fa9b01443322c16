//! A borrowed RGB565 pixel window.

use super::color::Color;
use super::primitives::Canvas;

/// One framebuffer's worth of pixels, borrowed for the duration of a draw.
pub struct Surface<'a> {
    pixels: &'a mut [u16],
    width: usize,
    height: usize,
}

impl<'a> Surface<'a> {
    /// Wrap `pixels` as a `width` x `height` surface.
    ///
    /// A short buffer is tolerated: pixels past its end are clipped like any
    /// other out-of-bounds write.
    pub fn new(pixels: &'a mut [u16], width: usize, height: usize) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u16] {
        &*self.pixels
    }

    /// FNV-1a over every pixel, used to detect any change to the surface.
    pub fn checksum(&self) -> u32 {
        checksum(&*self.pixels)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        (idx < self.pixels.len()).then_some(idx)
    }
}

impl Canvas for Surface<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.raw();
        }
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| Color(self.pixels[idx]))
    }

    fn buffer_mut(&mut self) -> &mut [u16] {
        &mut *self.pixels
    }
}

/// FNV-1a over a pixel slice, both bytes of each pixel.
pub fn checksum(pixels: &[u16]) -> u32 {
    const OFFSET: u32 = 0x811C_9DC5;
    const PRIME: u32 = 0x0100_0193;
    pixels.iter().fold(OFFSET, |hash, &px| {
        let [lo, hi] = px.to_le_bytes();
        let hash = (hash ^ u32::from(lo)).wrapping_mul(PRIME);
        (hash ^ u32::from(hi)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pixel_outside_bounds_leaves_surface_unchanged() {
        let mut buf = vec![0x1234u16; 32 * 24];
        let mut surface = Surface::new(&mut buf, 32, 24);
        surface.set_pixel(5, 5, Color::WHITE);
        let before = surface.checksum();

        for (x, y) in [
            (-1, 0),
            (0, -1),
            (32, 0),
            (0, 24),
            (i32::MIN, i32::MIN),
            (i32::MAX, 3),
            (31, 24),
            (32, 23),
        ] {
            surface.set_pixel(x, y, Color::FAIL);
        }

        assert_eq!(surface.checksum(), before);
    }

    #[test]
    fn set_pixel_in_bounds_changes_checksum() {
        let mut buf = vec![0u16; 16];
        let mut surface = Surface::new(&mut buf, 4, 4);
        let before = surface.checksum();
        surface.set_pixel(3, 3, Color::PASS);
        assert_ne!(surface.checksum(), before);
        assert_eq!(surface.pixel(3, 3), Some(Color::PASS));
        assert_eq!(surface.pixels()[15], Color::PASS.raw());
    }

    #[test]
    fn short_buffer_is_clipped() {
        let mut buf = vec![0u16; 6];
        let mut surface = Surface::new(&mut buf, 4, 4);
        surface.set_pixel(3, 3, Color::WHITE);
        assert_eq!(surface.pixel(3, 3), None);
        assert!(buf.iter().all(|p| *p == 0));
    }
}

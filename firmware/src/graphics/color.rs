//! RGB565 colors and the dashboard palette.

/// A 16-bit RGB565 pixel value: 5 bits red, 6 bits green, 5 bits blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Color(pub u16);

impl Color {
    /// Pack 8-bit channels, dropping the low bits of each.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r as u16) >> 3) << 11) | (((g as u16) >> 2) << 5) | ((b as u16) >> 3))
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Expand back to 8-bit channels, replicating the high bits into the
    /// low ones so full-scale values map to 255.
    pub const fn to_rgb888(self) -> [u8; 3] {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
    }

    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);

    // Dashboard palette (dark theme)
    pub const BACKGROUND: Color = Color(0x0841);
    pub const PANEL: Color = Color(0x1082);
    pub const BORDER: Color = Color(0x4A69);
    pub const TITLE_BG: Color = Color(0x0010);
    pub const TEXT: Color = Color(0xFFFF);
    pub const TEXT_DIM: Color = Color(0x8410);
    pub const PASS: Color = Color(0x07E0);
    pub const FAIL: Color = Color(0xF800);
    pub const WARN: Color = Color(0xFD20);
    pub const PROGRESS_BG: Color = Color(0x2104);
    pub const PROGRESS: Color = Color(0x04FF);
    pub const HIGHLIGHT: Color = Color(0xFFE0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_channels() {
        assert_eq!(Color::rgb(255, 0, 0), Color::FAIL);
        assert_eq!(Color::rgb(0, 255, 0), Color::PASS);
        assert_eq!(Color::rgb(0, 0, 255).raw(), 0x001F);
        assert_eq!(Color::rgb(255, 255, 255), Color::WHITE);
    }

    #[test]
    fn to_rgb888_expands_full_scale() {
        assert_eq!(Color::WHITE.to_rgb888(), [255, 255, 255]);
        assert_eq!(Color::BLACK.to_rgb888(), [0, 0, 0]);
        assert_eq!(Color::PASS.to_rgb888(), [0, 255, 0]);
    }
}

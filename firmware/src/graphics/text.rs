//! 8x8 bitmap text rendering.
//!
//! Glyphs come from the `font8x8` basic Latin table. Each glyph is eight
//! rows of one byte, least significant bit leftmost. Text advances a fixed
//! eight pixels per character.

use font8x8::{UnicodeFonts, BASIC_FONTS};

use super::color::Color;
use super::primitives::Canvas;

pub const GLYPH_WIDTH: i32 = 8;
pub const GLYPH_HEIGHT: i32 = 8;

/// Substituted for anything outside printable ASCII.
const FALLBACK: char = '?';

fn glyph(ch: char) -> [u8; 8] {
    let ch = if (' '..='\x7f').contains(&ch) { ch } else { FALLBACK };
    BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get(FALLBACK))
        .unwrap_or([0; 8])
}

/// Draw one glyph with its top-left corner at (x, y). Only set bits are
/// painted; the background shows through.
pub fn draw_char(canvas: &mut impl Canvas, x: i32, y: i32, ch: char, color: Color) {
    for (row, bits) in glyph(ch).into_iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << col) != 0 {
                canvas.set_pixel(x.saturating_add(col), y.saturating_add(row as i32), color);
            }
        }
    }
}

/// Draw a string left-aligned at (x, y).
pub fn draw_string(canvas: &mut impl Canvas, x: i32, y: i32, text: &str, color: Color) {
    let mut cursor = x;
    for ch in text.chars() {
        draw_char(canvas, cursor, y, ch, color);
        cursor = cursor.saturating_add(GLYPH_WIDTH);
    }
}

/// Draw a string horizontally centred on the canvas.
pub fn draw_string_center(canvas: &mut impl Canvas, y: i32, text: &str, color: Color) {
    let x = (canvas.width() as i32 - text_width(text)) / 2;
    draw_string(canvas, x, y, text, color);
}

/// Pixel width of `text` at the fixed advance.
pub fn text_width(text: &str) -> i32 {
    (text.chars().count() as i32).saturating_mul(GLYPH_WIDTH)
}

/// Draw `value` in decimal, right-aligned in a field of `digits` columns and
/// padded with spaces. Values wider than the field are drawn in full and
/// extend to the right.
pub fn draw_number(canvas: &mut impl Canvas, x: i32, y: i32, value: u32, digits: usize, color: Color) {
    // u32::MAX has ten digits
    let mut buf = [b' '; 10];
    let mut len = 0;
    let mut rest = value;
    loop {
        buf[buf.len() - 1 - len] = b'0' + (rest % 10) as u8;
        len += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }

    let pad = digits.saturating_sub(len);
    let start = buf.len() - len;
    let pad = i32::try_from(pad).unwrap_or(i32::MAX);
    let mut cursor = x.saturating_add(pad.saturating_mul(GLYPH_WIDTH));
    for &b in &buf[start..] {
        draw_char(canvas, cursor, y, b as char, color);
        cursor = cursor.saturating_add(GLYPH_WIDTH);
    }
}

/// Draw the low `digits` nibbles of `value` as upper-case hex, most
/// significant first.
pub fn draw_hex(canvas: &mut impl Canvas, x: i32, y: i32, value: u32, digits: usize, color: Color) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut rest = value;
    let digits = i32::try_from(digits).unwrap_or(i32::MAX);
    for i in (0..digits).rev() {
        let cx = x.saturating_add(i.saturating_mul(GLYPH_WIDTH));
        draw_char(canvas, cx, y, HEX[(rest & 0xF) as usize] as char, color);
        rest >>= 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::surface::Surface;

    /// Render `f` into a scratch surface and return which 8-pixel columns
    /// contain ink, as a string of '#' and '.'.
    fn ink_columns(width: usize, f: impl FnOnce(&mut Surface<'_>)) -> String {
        let mut buf = vec![0u16; width * 8];
        let mut surface = Surface::new(&mut buf, width, 8);
        f(&mut surface);
        (0..width / 8)
            .map(|cell| {
                let inked = (0..8).any(|row| {
                    (0..8).any(|col| surface.pixel(cell as i32 * 8 + col, row) != Some(Color::BLACK))
                });
                if inked {
                    '#'
                } else {
                    '.'
                }
            })
            .collect()
    }

    fn render_cell(ch: char) -> Vec<u16> {
        let mut buf = vec![0u16; 64];
        let mut surface = Surface::new(&mut buf, 8, 8);
        draw_char(&mut surface, 0, 0, ch, Color::WHITE);
        buf
    }

    #[test]
    fn glyph_matches_font_table() {
        let cell = render_cell('A');
        let expected = BASIC_FONTS.get('A').unwrap();
        for (row, bits) in expected.iter().enumerate() {
            for col in 0..8 {
                let lit = cell[row * 8 + col] == Color::WHITE.raw();
                assert_eq!(lit, bits & (1 << col) != 0, "row {row} col {col}");
            }
        }
    }

    #[test]
    fn unsupported_characters_use_fallback() {
        let fallback = render_cell('?');
        assert_eq!(render_cell('\u{7}'), fallback);
        assert_eq!(render_cell('é'), fallback);
        assert_eq!(render_cell('\u{2603}'), fallback);
        assert_ne!(render_cell('A'), fallback);
    }

    #[test]
    fn space_draws_nothing() {
        assert!(render_cell(' ').iter().all(|p| *p == 0));
    }

    #[test]
    fn number_is_right_aligned_and_space_padded() {
        let cols = ink_columns(64, |s| draw_number(s, 0, 0, 42, 6, Color::WHITE));
        assert_eq!(cols, "....##..");
        let cols = ink_columns(64, |s| draw_number(s, 0, 0, 0, 4, Color::WHITE));
        assert_eq!(cols, "...#....");
    }

    #[test]
    fn number_wider_than_field_is_not_truncated() {
        let cols = ink_columns(64, |s| draw_number(s, 0, 0, 123456, 2, Color::WHITE));
        assert_eq!(cols, "######..");
    }

    #[test]
    fn number_digits_render_in_order() {
        let mut expected = vec![0u16; 64 * 8];
        {
            let mut surface = Surface::new(&mut expected, 64, 8);
            draw_string(&mut surface, 16, 0, "1024", Color::WHITE);
        }
        let mut actual = vec![0u16; 64 * 8];
        {
            let mut surface = Surface::new(&mut actual, 64, 8);
            draw_number(&mut surface, 0, 0, 1024, 6, Color::WHITE);
        }
        assert_eq!(actual, expected);
    }

    #[test]
    fn hex_is_fixed_width_upper_case() {
        let mut expected = vec![0u16; 64 * 8];
        {
            let mut surface = Surface::new(&mut expected, 64, 8);
            draw_string(&mut surface, 0, 0, "00BEEF", Color::WHITE);
        }
        let mut actual = vec![0u16; 64 * 8];
        {
            let mut surface = Surface::new(&mut actual, 64, 8);
            draw_hex(&mut surface, 0, 0, 0xBEEF, 6, Color::WHITE);
        }
        assert_eq!(actual, expected);
    }

    #[test]
    fn hex_drops_nibbles_beyond_width() {
        let mut expected = vec![0u16; 32 * 8];
        {
            let mut surface = Surface::new(&mut expected, 32, 8);
            draw_string(&mut surface, 0, 0, "BEEF", Color::WHITE);
        }
        let mut actual = vec![0u16; 32 * 8];
        {
            let mut surface = Surface::new(&mut actual, 32, 8);
            draw_hex(&mut surface, 0, 0, 0xDEAD_BEEF, 4, Color::WHITE);
        }
        assert_eq!(actual, expected);
    }

    #[test]
    fn centered_string_is_balanced() {
        let cols = ink_columns(80, |s| draw_string_center(s, 0, "AB", Color::WHITE));
        assert_eq!(cols, "....##....");
        assert_eq!(text_width("PocketRiscV"), 88);
    }

    #[test]
    fn text_at_coordinate_extremes_is_clipped() {
        let cols = ink_columns(64, |s| {
            draw_string(s, i32::MAX - 3, 0, "AB", Color::WHITE);
            draw_string(s, i32::MIN, i32::MIN, "AB", Color::WHITE);
            draw_char(s, 0, i32::MAX - 2, 'W', Color::WHITE);
            draw_number(s, i32::MAX - 8, 0, u32::MAX, 12, Color::WHITE);
            draw_number(s, 0, 0, 7, usize::MAX, Color::WHITE);
            draw_hex(s, i32::MAX - 8, 0, 0xFFFF_FFFF, 8, Color::WHITE);
        });
        assert_eq!(cols, "........");
    }
}

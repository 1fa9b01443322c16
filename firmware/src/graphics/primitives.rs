//! 2D drawing primitives for RGB565 canvases.
//!
//! Every primitive clips against the canvas: coordinates outside the surface
//! are dropped silently, never reported.

use core::cmp::{max, min};

use super::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A writable pixel surface. Row-major, one `u16` per pixel, no padding.
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Set a single pixel (must handle bounds checking).
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Read back a pixel, `None` outside the surface.
    fn pixel(&self, x: i32, y: i32) -> Option<Color>;

    /// Raw pixel storage for span fills.
    fn buffer_mut(&mut self) -> &mut [u16];
}

fn to_i32_clamped(value: u32) -> i32 {
    if value > i32::MAX as u32 {
        i32::MAX
    } else {
        value as i32
    }
}

fn clip_rect_to_bounds(rect: Rect, width: usize, height: usize) -> Option<Rect> {
    let canvas_w = width as i32;
    let canvas_h = height as i32;
    if canvas_w <= 0 || canvas_h <= 0 {
        return None;
    }

    let rect_w = to_i32_clamped(rect.width);
    let rect_h = to_i32_clamped(rect.height);
    if rect_w <= 0 || rect_h <= 0 {
        return None;
    }

    let x0 = rect.x;
    let y0 = rect.y;
    let x1 = x0.saturating_add(rect_w);
    let y1 = y0.saturating_add(rect_h);

    let cx0 = max(0, min(canvas_w, x0));
    let cy0 = max(0, min(canvas_h, y0));
    let cx1 = max(0, min(canvas_w, x1));
    let cy1 = max(0, min(canvas_h, y1));

    if cx0 >= cx1 || cy0 >= cy1 {
        return None;
    }

    Some(Rect {
        x: cx0,
        y: cy0,
        width: (cx1 - cx0) as u32,
        height: (cy1 - cy0) as u32,
    })
}

/// Draw a horizontal span from `x1` to `x2` inclusive.
pub fn draw_hline(canvas: &mut impl Canvas, x1: i32, x2: i32, y: i32, color: Color) {
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    if width <= 0 || y < 0 || y >= height {
        return;
    }

    let start = max(min(x1, x2), 0);
    let end = min(max(x1, x2), width - 1);
    if start > end {
        return;
    }

    let row = y as usize * width as usize;
    let buffer = canvas.buffer_mut();
    let first = row + start as usize;
    let last = min(row + end as usize + 1, buffer.len());
    if first >= last {
        return;
    }
    buffer[first..last].fill(color.raw());
}

/// Draw a vertical span from `y1` to `y2` inclusive.
pub fn draw_vline(canvas: &mut impl Canvas, x: i32, y1: i32, y2: i32, color: Color) {
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    if height <= 0 || x < 0 || x >= width {
        return;
    }

    let start = max(min(y1, y2), 0);
    let end = min(max(y1, y2), height - 1);
    for y in start..=end {
        canvas.set_pixel(x, y, color);
    }
}

/// Whether a box given by inclusive corners can touch the canvas at all.
/// Corners are `i64` so centre plus radius never overflows.
fn box_touches_canvas(canvas: &impl Canvas, x0: i64, y0: i64, x1: i64, y1: i64) -> bool {
    let width = canvas.width() as i64;
    let height = canvas.height() as i64;
    x1 >= 0 && y1 >= 0 && x0 < width && y0 < height
}

/// Draw a line from (x1, y1) to (x2, y2) inclusive.
///
/// Axis-aligned lines become spans. Anything else is stepped with
/// Bresenham, with the error term kept in `i64` so endpoints anywhere in
/// the `i32` plane are accepted.
pub fn draw_line(canvas: &mut impl Canvas, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    if y1 == y2 {
        draw_hline(canvas, x1, x2, y1, color);
        return;
    }
    if x1 == x2 {
        draw_vline(canvas, x1, y1, y2, color);
        return;
    }
    let (lx, hx) = (i64::from(min(x1, x2)), i64::from(max(x1, x2)));
    let (ly, hy) = (i64::from(min(y1, y2)), i64::from(max(y1, y2)));
    if !box_touches_canvas(canvas, lx, ly, hx, hy) {
        return;
    }

    let dx = hx - lx;
    let dy = -(hy - ly);
    let step_x = if x1 < x2 { 1 } else { -1 };
    let step_y = if y1 < y2 { 1 } else { -1 };
    let (mut x, mut y) = (x1, y1);
    let mut err = dx + dy;

    loop {
        canvas.set_pixel(x, y, color);
        if x == x2 && y == y2 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += step_x;
        }
        if doubled <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Draw rectangle outline.
pub fn draw_rect(canvas: &mut impl Canvas, rect: Rect, color: Color) {
    let rect_w = to_i32_clamped(rect.width);
    let rect_h = to_i32_clamped(rect.height);
    if rect_w <= 0 || rect_h <= 0 {
        return;
    }

    let x2 = rect.x.saturating_add(rect_w - 1);
    let y2 = rect.y.saturating_add(rect_h - 1);

    draw_hline(canvas, rect.x, x2, rect.y, color);
    draw_hline(canvas, rect.x, x2, y2, color);
    draw_vline(canvas, rect.x, rect.y, y2, color);
    draw_vline(canvas, x2, rect.y, y2, color);
}

/// Draw filled rectangle, one span per row.
pub fn fill_rect(canvas: &mut impl Canvas, rect: Rect, color: Color) {
    let Some(clipped) = clip_rect_to_bounds(rect, canvas.width(), canvas.height()) else {
        return;
    };

    let x2 = clipped.x + clipped.width as i32 - 1;
    for y in clipped.y..clipped.y + clipped.height as i32 {
        draw_hline(canvas, clipped.x, x2, y, color);
    }
}

/// Steps of the midpoint circle algorithm for one octant.
///
/// Yields `(x, y)` offsets from the centre with `x >= y`; the other seven
/// octants follow by symmetry. Outline and filled circles both walk this
/// sequence so their extents agree on every scanline.
struct MidpointCircle {
    x: i32,
    y: i32,
    err: i64,
}

impl MidpointCircle {
    fn new(radius: i32) -> Self {
        Self {
            x: radius,
            y: 0,
            err: 1 - i64::from(radius),
        }
    }
}

impl Iterator for MidpointCircle {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.x < self.y {
            return None;
        }
        let step = (self.x, self.y);

        self.y += 1;
        if self.err < 0 {
            self.err += 2 * i64::from(self.y) + 1;
        } else {
            self.x -= 1;
            self.err += 2 * (i64::from(self.y) - i64::from(self.x)) + 1;
        }
        Some(step)
    }
}

fn circle_touches_canvas(canvas: &impl Canvas, cx: i32, cy: i32, r: i32) -> bool {
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
    box_touches_canvas(canvas, cx - r, cy - r, cx + r, cy + r)
}

/// Draw circle outline using midpoint circle algorithm.
pub fn draw_circle(canvas: &mut impl Canvas, cx: i32, cy: i32, radius: u32, color: Color) {
    let r = to_i32_clamped(radius);
    if r <= 0 {
        canvas.set_pixel(cx, cy, color);
        return;
    }
    if !circle_touches_canvas(canvas, cx, cy, r) {
        return;
    }

    // Saturated points land off the canvas and are dropped by set_pixel.
    for (x, y) in MidpointCircle::new(r) {
        let (left, right) = (cx.saturating_sub(x), cx.saturating_add(x));
        let (top, bottom) = (cy.saturating_sub(y), cy.saturating_add(y));
        let (inner_left, inner_right) = (cx.saturating_sub(y), cx.saturating_add(y));
        let (outer_top, outer_bottom) = (cy.saturating_sub(x), cy.saturating_add(x));
        canvas.set_pixel(right, bottom, color);
        canvas.set_pixel(left, bottom, color);
        canvas.set_pixel(right, top, color);
        canvas.set_pixel(left, top, color);
        canvas.set_pixel(inner_right, outer_bottom, color);
        canvas.set_pixel(inner_left, outer_bottom, color);
        canvas.set_pixel(inner_right, outer_top, color);
        canvas.set_pixel(inner_left, outer_top, color);
    }
}

/// Draw filled circle: spans between each pair of symmetric outline points.
pub fn fill_circle(canvas: &mut impl Canvas, cx: i32, cy: i32, radius: u32, color: Color) {
    let r = to_i32_clamped(radius);
    if r <= 0 {
        canvas.set_pixel(cx, cy, color);
        return;
    }
    if !circle_touches_canvas(canvas, cx, cy, r) {
        return;
    }

    for (x, y) in MidpointCircle::new(r) {
        let (left, right) = (cx.saturating_sub(x), cx.saturating_add(x));
        let (inner_left, inner_right) = (cx.saturating_sub(y), cx.saturating_add(y));
        draw_hline(canvas, left, right, cy.saturating_add(y), color);
        draw_hline(canvas, left, right, cy.saturating_sub(y), color);
        draw_hline(canvas, inner_left, inner_right, cy.saturating_add(x), color);
        draw_hline(canvas, inner_left, inner_right, cy.saturating_sub(x), color);
    }
}

/// Horizontal progress bar: background, proportional fill, then border.
pub fn draw_progress_bar(
    canvas: &mut impl Canvas,
    rect: Rect,
    percent: u32,
    fill: Color,
    background: Color,
    border: Color,
) {
    fill_rect(canvas, rect, background);
    let filled = (u64::from(rect.width) * u64::from(percent.min(100)) / 100) as u32;
    if filled > 0 {
        fill_rect(canvas, Rect { width: filled, ..rect }, fill);
    }
    draw_rect(canvas, rect, border);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::surface::Surface;
    use std::collections::BTreeSet;

    fn lit(surface: &Surface<'_>) -> BTreeSet<(i32, i32)> {
        let mut set = BTreeSet::new();
        for y in 0..surface.height() as i32 {
            for x in 0..surface.width() as i32 {
                if surface.pixel(x, y) != Some(Color::BLACK) {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    #[test]
    fn bounds_checking_ignores_out_of_range_pixels() {
        let mut buf = vec![0u16; 4];
        let mut canvas = Surface::new(&mut buf, 2, 2);
        draw_line(&mut canvas, -2, -2, -1, -1, Color::WHITE);
        assert!(canvas.pixels().iter().all(|p| *p == 0));

        draw_line(&mut canvas, -1, 0, 1, 0, Color::FAIL);
        assert_eq!(canvas.pixel(0, 0), Some(Color::FAIL));
        assert_eq!(canvas.pixel(1, 0), Some(Color::FAIL));
        assert_eq!(canvas.pixel(0, 1), Some(Color::BLACK));
    }

    #[test]
    fn clip_rect_intersects_with_canvas_bounds() {
        let clipped = clip_rect_to_bounds(Rect::new(-5, -5, 8, 8), 10, 10).expect("rect should clip");
        assert_eq!(clipped, Rect::new(0, 0, 3, 3));
        assert!(clip_rect_to_bounds(Rect::new(12, 0, 4, 4), 10, 10).is_none());
        assert!(clip_rect_to_bounds(Rect::new(0, 0, 0, 4), 10, 10).is_none());
    }

    #[test]
    fn fill_rect_covers_exact_area() {
        let mut buf = vec![0u16; 100];
        let mut canvas = Surface::new(&mut buf, 10, 10);
        fill_rect(&mut canvas, Rect::new(2, 3, 4, 2), Color::WHITE);
        let set = lit(&canvas);
        assert_eq!(set.len(), 8);
        assert!(set.contains(&(2, 3)) && set.contains(&(5, 4)));
        assert!(!set.contains(&(6, 3)) && !set.contains(&(2, 5)));
    }

    #[test]
    fn draw_rect_is_hollow() {
        let mut buf = vec![0u16; 100];
        let mut canvas = Surface::new(&mut buf, 10, 10);
        draw_rect(&mut canvas, Rect::new(1, 1, 5, 4), Color::WHITE);
        let set = lit(&canvas);
        // 2 * 5 + 2 * (4 - 2) edge pixels
        assert_eq!(set.len(), 14);
        assert!(!set.contains(&(3, 2)));
        assert!(set.contains(&(5, 4)));
    }

    #[test]
    fn circle_outline_is_symmetric() {
        let mut buf = vec![0u16; 31 * 31];
        let mut canvas = Surface::new(&mut buf, 31, 31);
        draw_circle(&mut canvas, 15, 15, 10, Color::WHITE);
        let set = lit(&canvas);
        assert!(set.contains(&(25, 15)) && set.contains(&(5, 15)));
        assert!(set.contains(&(15, 25)) && set.contains(&(15, 5)));
        for &(x, y) in &set {
            assert!(set.contains(&(30 - x, y)));
            assert!(set.contains(&(x, 30 - y)));
            assert!(set.contains(&(y, x)));
        }
        assert!(!set.contains(&(15, 15)));
    }

    #[test]
    fn filled_circle_contains_outline() {
        for radius in [0u32, 1, 2, 5, 9, 14] {
            let mut outline_buf = vec![0u16; 40 * 40];
            let mut outline = Surface::new(&mut outline_buf, 40, 40);
            draw_circle(&mut outline, 20, 20, radius, Color::WHITE);
            let outline_set = lit(&outline);

            let mut filled_buf = vec![0u16; 40 * 40];
            let mut filled = Surface::new(&mut filled_buf, 40, 40);
            fill_circle(&mut filled, 20, 20, radius, Color::WHITE);
            let filled_set = lit(&filled);

            assert!(
                outline_set.is_subset(&filled_set),
                "radius {radius}: outline escapes fill"
            );
            assert!(filled_set.contains(&(20, 20)));
        }
    }

    #[test]
    fn filled_circle_spans_match_outline_extent_per_row() {
        let mut outline_buf = vec![0u16; 40 * 40];
        let mut outline = Surface::new(&mut outline_buf, 40, 40);
        draw_circle(&mut outline, 20, 20, 12, Color::WHITE);
        let outline_set = lit(&outline);

        let mut filled_buf = vec![0u16; 40 * 40];
        let mut filled = Surface::new(&mut filled_buf, 40, 40);
        fill_circle(&mut filled, 20, 20, 12, Color::WHITE);
        let filled_set = lit(&filled);

        for y in 0..40 {
            let row = |set: &BTreeSet<(i32, i32)>| -> Vec<i32> {
                set.iter().filter(|p| p.1 == y).map(|p| p.0).collect()
            };
            let o = row(&outline_set);
            let f = row(&filled_set);
            assert_eq!(o.first(), f.first(), "row {y} left edge");
            assert_eq!(o.last(), f.last(), "row {y} right edge");
        }
    }

    #[test]
    fn circle_clips_at_edges() {
        let mut buf = vec![0u16; 16 * 16];
        let mut canvas = Surface::new(&mut buf, 16, 16);
        fill_circle(&mut canvas, 0, 0, 6, Color::WHITE);
        draw_circle(&mut canvas, 15, 15, 9, Color::WHITE);
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(6, 0), Some(Color::WHITE));
    }

    #[test]
    fn progress_bar_fill_is_proportional() {
        let mut buf = vec![0u16; 40 * 6];
        let mut canvas = Surface::new(&mut buf, 40, 6);
        let bar = Rect::new(0, 0, 40, 6);
        draw_progress_bar(&mut canvas, bar, 50, Color::PROGRESS, Color::PROGRESS_BG, Color::BORDER);
        assert_eq!(canvas.pixel(10, 3), Some(Color::PROGRESS));
        assert_eq!(canvas.pixel(19, 3), Some(Color::PROGRESS));
        assert_eq!(canvas.pixel(20, 3), Some(Color::PROGRESS_BG));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BORDER));
        assert_eq!(canvas.pixel(39, 5), Some(Color::BORDER));

        draw_progress_bar(&mut canvas, bar, 250, Color::PROGRESS, Color::PROGRESS_BG, Color::BORDER);
        assert_eq!(canvas.pixel(38, 3), Some(Color::PROGRESS));
    }

    #[test]
    fn lines_at_coordinate_extremes_are_clipped() {
        let mut buf = vec![0u16; 8 * 8];
        let mut canvas = Surface::new(&mut buf, 8, 8);
        draw_line(&mut canvas, i32::MIN, 0, 0, 0, Color::WHITE);
        draw_line(&mut canvas, 3, i32::MAX, 3, i32::MIN, Color::WHITE);
        draw_line(&mut canvas, i32::MIN, i32::MIN, i32::MAX, i32::MIN + 1, Color::WHITE);
        draw_line(&mut canvas, i32::MAX - 4, i32::MAX - 4, i32::MAX, i32::MAX, Color::WHITE);
        draw_line(&mut canvas, -40, -40, 2, 2, Color::WHITE);

        let set = lit(&canvas);
        assert!(set.contains(&(0, 0)));
        assert!((0..8).all(|y| set.contains(&(3, y))));
        assert!(set.contains(&(1, 1)) && set.contains(&(2, 2)));
        assert!(!set.contains(&(1, 0)));
        assert_eq!(set.len(), 8 + 1 + 2);
    }

    #[test]
    fn circles_at_coordinate_extremes_are_clipped() {
        let mut buf = vec![0u16; 8 * 8];
        let mut canvas = Surface::new(&mut buf, 8, 8);
        fill_circle(&mut canvas, i32::MAX, 0, 4, Color::WHITE);
        fill_circle(&mut canvas, i32::MIN, i32::MIN, 4, Color::WHITE);
        draw_circle(&mut canvas, i32::MAX, i32::MAX, 4, Color::WHITE);
        draw_circle(&mut canvas, 0, i32::MIN, 4, Color::WHITE);
        fill_circle(&mut canvas, i32::MIN + 2, 3, 1, Color::WHITE);
        assert!(canvas.pixels().iter().all(|p| *p == 0));
    }
}

//! Fixed 320x240 dashboard layout.
//!
//! ```text
//! +--------------------------------------------+
//! |        PocketRiscV System Dashboard        |  y 0..16
//! | [System Info        ] [Cycle Counter     ] |  y 22..72
//! | [Region status, one full or two compact  ] |  y 78..148
//! | [CPU Instruction Tests                   ] |  y 154..234
//! +--------------------------------------------+
//! ```

use super::{DashboardState, RegionStatus, RegionVerdict};
use crate::graphics::color::Color;
use crate::graphics::primitives::{draw_line, draw_progress_bar, draw_rect, fill_rect, Canvas, Rect};
use crate::graphics::text::{draw_char, draw_hex, draw_number, draw_string, draw_string_center, text_width};
use crate::selftest::{Category, CategoryResult};

const TITLE: &str = "PocketRiscV System Dashboard";
const TITLE_BAR_HEIGHT: u32 = 16;
const PANEL_TITLE_HEIGHT: u32 = 12;

const SYSTEM_PANEL: Rect = Rect::new(5, 22, 150, 50);
const CYCLE_PANEL: Rect = Rect::new(165, 22, 150, 50);
const REGION_AREA: Rect = Rect::new(5, 78, 310, 70);
const COMPACT_HEIGHT: u32 = 34;
const COMPACT_GAP: i32 = 2;
const CPU_PANEL: Rect = Rect::new(5, 154, 310, 80);

/// Draw a complete frame from `state`. Every pixel of the canvas is
/// rewritten, so nothing from the previous use of the surface survives.
pub fn render(canvas: &mut impl Canvas, state: &DashboardState) {
    let full = Rect::new(0, 0, canvas.width() as u32, canvas.height() as u32);
    fill_rect(canvas, full, Color::BACKGROUND);

    fill_rect(canvas, Rect::new(0, 0, full.width, TITLE_BAR_HEIGHT), Color::TITLE_BG);
    draw_string_center(canvas, 4, TITLE, Color::HIGHLIGHT);

    draw_system_info(canvas, state);
    draw_cycle_counter(canvas, state.cycles);

    match state.regions.as_slice() {
        [] => {}
        [only] => draw_region_full(canvas, REGION_AREA, only),
        many => {
            for (i, region) in many.iter().enumerate() {
                let y = REGION_AREA.y + i as i32 * (COMPACT_HEIGHT as i32 + COMPACT_GAP);
                let rect = Rect::new(REGION_AREA.x, y, REGION_AREA.width, COMPACT_HEIGHT);
                draw_region_compact(canvas, rect, region);
            }
        }
    }

    draw_cpu_tests(canvas, state);
}

fn draw_panel(canvas: &mut impl Canvas, rect: Rect, title: &str) {
    fill_rect(canvas, rect, Color::PANEL);
    fill_rect(
        canvas,
        Rect::new(rect.x, rect.y, rect.width, PANEL_TITLE_HEIGHT),
        Color::TITLE_BG,
    );
    draw_string(canvas, rect.x + 4, rect.y + 2, title, Color::TEXT);
    draw_rect(canvas, rect, Color::BORDER);
}

fn draw_system_info(canvas: &mut impl Canvas, state: &DashboardState) {
    draw_panel(canvas, SYSTEM_PANEL, "System Info");
    draw_string(canvas, 10, 36, "CPU:", Color::TEXT_DIM);
    draw_string(canvas, 50, 36, state.system.cpu, Color::TEXT);
    draw_string(canvas, 10, 46, "RAM:", Color::TEXT_DIM);
    draw_string(canvas, 50, 46, state.system.ram, Color::TEXT);
    draw_string(canvas, 10, 56, "SDRAM:", Color::TEXT_DIM);
    draw_string(canvas, 58, 56, state.system.sdram, Color::TEXT);
}

fn draw_cycle_counter(canvas: &mut impl Canvas, cycles: u64) {
    draw_panel(canvas, CYCLE_PANEL, "Cycle Counter");
    let lo = cycles as u32;
    let hi = (cycles >> 32) as u32;
    // Two 4-digit groups, butted together
    draw_string(canvas, 170, 40, "Cycles:", Color::TEXT_DIM);
    draw_hex(canvas, 230, 40, lo >> 16, 4, Color::TEXT);
    draw_hex(canvas, 262, 40, lo & 0xFFFF, 4, Color::TEXT);
    draw_string(canvas, 170, 54, "High:", Color::TEXT_DIM);
    draw_hex(canvas, 230, 54, hi, 8, Color::TEXT_DIM);
}

/// Three zero-padded digits and a percent sign, e.g. `050%`.
fn draw_percent(canvas: &mut impl Canvas, x: i32, y: i32, percent: u32, color: Color) {
    let p = percent.min(100);
    let digits = [(p / 100) % 10, (p / 10) % 10, p % 10];
    for (i, d) in digits.into_iter().enumerate() {
        draw_char(canvas, x + i as i32 * 8, y, char::from(b'0' + d as u8), color);
    }
    draw_char(canvas, x + 24, y, '%', color);
}

fn error_color(errors: u32) -> Color {
    if errors == 0 {
        Color::PASS
    } else {
        Color::FAIL
    }
}

fn verdict_text(verdict: RegionVerdict) -> (&'static str, Color) {
    match verdict {
        RegionVerdict::Testing => ("Testing...", Color::WARN),
        RegionVerdict::Passed => ("PASSED", Color::PASS),
        RegionVerdict::Failed => ("FAILED", Color::FAIL),
    }
}

fn draw_region_full(canvas: &mut impl Canvas, rect: Rect, region: &RegionStatus) {
    draw_panel(canvas, rect, region.title);
    let (x, y) = (rect.x, rect.y);

    draw_string(canvas, x + 5, y + 16, "Progress:", Color::TEXT_DIM);
    draw_progress_bar(
        canvas,
        Rect::new(x + 75, y + 14, 180, 12),
        region.progress,
        Color::PROGRESS,
        Color::PROGRESS_BG,
        Color::BORDER,
    );
    draw_percent(canvas, x + 263, y + 16, region.progress, Color::TEXT);

    draw_string(canvas, x + 5, y + 32, "Tested:", Color::TEXT_DIM);
    draw_number(canvas, x + 65, y + 32, region.tested_kib, 4, Color::TEXT);
    draw_string(canvas, x + 105, y + 32, "KB", Color::TEXT);

    draw_string(canvas, x + 145, y + 32, "Errors:", Color::TEXT_DIM);
    draw_number(canvas, x + 205, y + 32, region.errors, 6, error_color(region.errors));

    draw_string(canvas, x + 5, y + 48, "Status:", Color::TEXT_DIM);
    let (text, color) = verdict_text(region.verdict);
    draw_string(canvas, x + 65, y + 48, text, color);

    if region.verdict == RegionVerdict::Testing {
        draw_string(canvas, x + 161, y + 48, region.phase.name(), Color::TEXT_DIM);
    }
}

fn draw_region_compact(canvas: &mut impl Canvas, rect: Rect, region: &RegionStatus) {
    draw_panel(canvas, rect, region.title);
    let (x, y) = (rect.x, rect.y);

    // tested size, right-aligned in the title bar
    let right = x + rect.width as i32 - 4;
    draw_string(canvas, right - 16, y + 2, "KB", Color::TEXT_DIM);
    draw_number(canvas, right - 16 - 40, y + 2, region.tested_kib, 4, Color::TEXT);

    draw_progress_bar(
        canvas,
        Rect::new(x + 5, y + 16, 120, 12),
        region.progress,
        Color::PROGRESS,
        Color::PROGRESS_BG,
        Color::BORDER,
    );
    draw_percent(canvas, x + 131, y + 18, region.progress, Color::TEXT);

    draw_string(canvas, x + 171, y + 18, "Err:", Color::TEXT_DIM);
    draw_number(canvas, x + 203, y + 18, region.errors, 5, error_color(region.errors));

    let (text, color) = match region.verdict {
        RegionVerdict::Testing => ("TEST", Color::WARN),
        RegionVerdict::Passed => ("PASS", Color::PASS),
        RegionVerdict::Failed => ("FAIL", Color::FAIL),
    };
    draw_string(canvas, right - text_width(text), y + 18, text, color);
}

fn draw_category(canvas: &mut impl Canvas, x: i32, y: i32, result: CategoryResult, result_x: i32) {
    draw_string(canvas, x, y, result.category.label(), Color::TEXT_DIM);
    let color = if result.all_passed() {
        Color::PASS
    } else {
        Color::FAIL
    };
    draw_number(canvas, result_x, y, result.passed, 1, color);
    draw_char(canvas, result_x + 8, y, '/', color);
    draw_number(canvas, result_x + 16, y, result.total, 1, color);
}

fn draw_cpu_tests(canvas: &mut impl Canvas, state: &DashboardState) {
    draw_panel(canvas, CPU_PANEL, "CPU Instruction Tests");
    let tests = &state.self_test;

    let left = [
        Category::Arithmetic,
        Category::Logical,
        Category::Shifts,
        Category::Compare,
    ];
    for (row, category) in left.into_iter().enumerate() {
        draw_category(canvas, 10, 170 + row as i32 * 12, tests.get(category), 106);
    }
    for (row, category) in [Category::Memory, Category::Branch].into_iter().enumerate() {
        draw_category(canvas, 160, 170 + row as i32 * 12, tests.get(category), 230);
    }

    // column divider and the rule over the totals
    draw_line(canvas, 150, 168, 150, 204, Color::BORDER);
    draw_line(canvas, 10, 215, 310, 215, Color::BORDER);

    draw_string(canvas, 110, 218, "Total:", Color::TEXT_DIM);
    draw_number(canvas, 160, 218, tests.passed(), 2, Color::TEXT);
    draw_string(canvas, 180, 218, "/", Color::TEXT);
    draw_number(canvas, 190, 218, tests.total(), 2, Color::TEXT);

    if tests.total() > 0 {
        if tests.all_passed() {
            draw_string(canvas, 230, 218, "ALL PASS", Color::PASS);
        } else {
            draw_string(canvas, 230, 218, "FAILED", Color::FAIL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::POCKET_CONFIG;
    use crate::graphics::surface::Surface;
    use crate::memtest::MemoryRegion;
    use crate::platform::{FB_HEIGHT, FB_PIXELS, FB_WIDTH};
    use crate::selftest;

    fn state_with(regions: &[MemoryRegion]) -> DashboardState {
        DashboardState::capture(0xDEAD_BEEF, regions.iter(), selftest::run(), POCKET_CONFIG.system)
    }

    fn rendered(state: &DashboardState) -> Vec<u16> {
        let mut buf = vec![0u16; FB_PIXELS];
        let mut surface = Surface::new(&mut buf, FB_WIDTH, FB_HEIGHT);
        render(&mut surface, state);
        buf
    }

    fn at(buf: &[u16], x: usize, y: usize) -> Color {
        Color(buf[y * FB_WIDTH + x])
    }

    /// Does any pixel in the 8x8 cell at (x, y) carry `color`?
    fn cell_has(buf: &[u16], x: usize, y: usize, color: Color) -> bool {
        (y..y + 8).any(|py| (x..x + 8).any(|px| at(buf, px, py) == color))
    }

    #[test]
    fn frame_has_fixed_chrome() {
        let buf = rendered(&state_with(&[MemoryRegion::with_geometry("SDRAM", 0x1020_0000, 1024)]));
        assert_eq!(at(&buf, 0, 20), Color::BACKGROUND);
        assert_eq!(at(&buf, 319, 239), Color::BACKGROUND);
        assert_eq!(at(&buf, 1, 1), Color::TITLE_BG);
        assert_eq!(at(&buf, 5, 22), Color::BORDER);
        assert_eq!(at(&buf, 100, 70), Color::PANEL);
        assert!((4..12).any(|y| (0..FB_WIDTH).any(|x| at(&buf, x, y) == Color::HIGHLIGHT)));
    }

    #[test]
    fn render_overwrites_everything() {
        let state = state_with(&[MemoryRegion::with_geometry("SDRAM", 0x1020_0000, 1024)]);
        let mut a = vec![0u16; FB_PIXELS];
        let mut b = vec![0xFFFFu16; FB_PIXELS];
        render(&mut Surface::new(&mut a, FB_WIDTH, FB_HEIGHT), &state);
        render(&mut Surface::new(&mut b, FB_WIDTH, FB_HEIGHT), &state);
        assert_eq!(a, b);
    }

    #[test]
    fn progress_bar_reflects_percent() {
        let mut status = RegionStatus {
            title: "SDRAM",
            progress: 50,
            tested_kib: 512,
            errors: 0,
            phase: crate::memtest::TestPhase::AllOnes,
            verdict: RegionVerdict::Testing,
        };
        let mut state = state_with(&[]);
        state.regions.push(status).unwrap();
        let buf = rendered(&state);
        // bar spans x 80..260 at y 92..104
        assert_eq!(at(&buf, 85, 98), Color::PROGRESS);
        assert_eq!(at(&buf, 169, 98), Color::PROGRESS);
        assert_eq!(at(&buf, 171, 98), Color::PROGRESS_BG);
        assert!(cell_has(&buf, 70, 126, Color::WARN));

        status.progress = 100;
        status.verdict = RegionVerdict::Failed;
        status.errors = 3;
        state.regions[0] = status;
        let buf = rendered(&state);
        assert_eq!(at(&buf, 258, 98), Color::PROGRESS);
        assert!(cell_has(&buf, 70, 126, Color::FAIL));
        // right-aligned six-digit field starting at x 210: "     3"
        assert!(cell_has(&buf, 250, 110, Color::FAIL));
        assert!(!cell_has(&buf, 210, 110, Color::FAIL));
    }

    #[test]
    fn passed_region_shows_green_status() {
        let mut state = state_with(&[]);
        state
            .regions
            .push(RegionStatus {
                title: "SDRAM",
                progress: 100,
                tested_kib: 1024,
                errors: 0,
                phase: crate::memtest::TestPhase::Checkerboard,
                verdict: RegionVerdict::Passed,
            })
            .unwrap();
        let buf = rendered(&state);
        assert!(cell_has(&buf, 70, 126, Color::PASS));
        assert!(cell_has(&buf, 250, 110, Color::PASS));
    }

    #[test]
    fn two_regions_use_compact_panels() {
        let regions = [
            MemoryRegion::with_geometry("Bank A", 0x1020_0000, 1024),
            MemoryRegion::with_geometry("Bank B", 0x1030_0000, 1024),
        ];
        let buf = rendered(&state_with(&regions));
        // each compact panel has its own border and title bar
        assert_eq!(at(&buf, 5, 78), Color::BORDER);
        assert_eq!(at(&buf, 5, 111), Color::BORDER);
        assert_eq!(at(&buf, 5, 114), Color::BORDER);
        assert_eq!(at(&buf, 5, 147), Color::BORDER);
        assert_eq!(at(&buf, 100, 80), Color::TITLE_BG);
        assert_eq!(at(&buf, 100, 116), Color::TITLE_BG);
        // gap between them shows the background
        assert_eq!(at(&buf, 100, 112), Color::BACKGROUND);
    }

    #[test]
    fn cpu_panel_reports_all_pass() {
        let buf = rendered(&state_with(&[]));
        assert!(cell_has(&buf, 230, 218, Color::PASS));
        assert!(cell_has(&buf, 106, 170, Color::PASS));
        assert!(cell_has(&buf, 230, 182, Color::PASS));
    }

    #[test]
    fn cpu_panel_columns_are_ruled() {
        let buf = rendered(&state_with(&[]));
        assert_eq!(at(&buf, 150, 168), Color::BORDER);
        assert_eq!(at(&buf, 150, 204), Color::BORDER);
        assert_ne!(at(&buf, 150, 210), Color::BORDER);
        assert_eq!(at(&buf, 10, 215), Color::BORDER);
        assert_eq!(at(&buf, 310, 215), Color::BORDER);
    }

    #[test]
    fn cycle_counter_shows_low_word_in_hex() {
        let buf = rendered(&state_with(&[]));
        let mut expected = vec![0u16; FB_PIXELS];
        {
            let mut surface = Surface::new(&mut expected, FB_WIDTH, FB_HEIGHT);
            fill_rect(&mut surface, CYCLE_PANEL, Color::PANEL);
            draw_string(&mut surface, 230, 40, "DEADBEEF", Color::TEXT);
        }
        for y in 40..48 {
            for x in 230..294 {
                let want = Color(expected[y * FB_WIDTH + x]);
                assert_eq!(at(&buf, x, y), want, "pixel ({x}, {y})");
            }
        }
    }
}

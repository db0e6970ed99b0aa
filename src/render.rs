//! Stateless drawing primitives for one quadrant.
//!
//! Every operation writes through the serpentine [`Layout`] and flushes
//! exactly once at the end, so a full redraw costs one transfer per quadrant.
//! A quadrant index beyond the connected device count is a no-op.

use smart_leds::RGB8;
use smart_leds::hsv::{Hsv, hsv2rgb};

use crate::constants::{INTERIOR_ROWS, VISIBLE_COLS, VISIBLE_ROWS};
use crate::display::QuadDisplays;
use crate::layout::Layout;

/// Brightness at the bottom row of the depth gradient.
const GRADIENT_FLOOR: u8 = 50;
/// Brightness at the top row of the depth gradient.
const GRADIENT_CEIL: u8 = 255;

/// Visible cell count, used to spread one hue revolution across a quadrant.
const CELLS: u16 = (VISIBLE_ROWS * VISIBLE_COLS) as u16;

// Mascot face glyph in quadrant-local (col,row) coordinates, row 0 at the
// bottom. Drawn as outline points plus horizontal fill runs.
const OUTLINE_POINTS: &[(u8, u8)] = &[
    // eyes
    (6, 11), (10, 11),
    // snout
    (7, 8), (8, 8), (9, 8), (7, 9), (9, 9), (8, 7), (8, 6), (7, 5), (9, 5), (6, 9), (10, 9),
    // ears
    (3, 13), (4, 12), (5, 13), (4, 13), (4, 14),
    (12, 12), (12, 13), (13, 13), (11, 13), (12, 14),
    // chin
    (5, 2), (6, 2), (7, 2), (8, 2), (9, 2), (10, 2), (11, 2),
    // left jaw up to the brow
    (4, 3), (3, 4), (2, 5), (1, 6), (1, 7), (1, 8), (1, 9), (2, 10), (2, 11),
    (1, 12), (1, 13), (1, 14), (2, 15), (3, 16), (4, 16), (5, 16), (6, 15), (7, 14),
    // right jaw up to the brow
    (12, 3), (13, 4), (14, 5), (15, 6), (15, 7), (15, 8), (15, 9), (14, 10), (14, 11),
    (15, 12), (15, 13), (15, 14), (14, 15), (13, 16), (12, 16), (11, 16), (10, 15), (9, 14),
    // crown
    (8, 14),
];

// Fur between the outline strokes: (row, first col, last col exclusive).
const FILL_RUNS: &[(u8, u8, u8)] = &[
    (3, 5, 12), (4, 4, 13), (5, 3, 7), (5, 10, 14), (6, 2, 8), (6, 9, 15),
    (7, 2, 8), (7, 9, 15), (8, 2, 7), (8, 10, 15), (9, 2, 6), (9, 11, 15),
    (10, 3, 14), (11, 3, 6), (11, 7, 10), (11, 11, 14), (12, 2, 4), (12, 5, 12),
    (12, 13, 15), (13, 6, 11), (14, 2, 4), (14, 5, 7), (14, 10, 12), (14, 13, 15),
    (15, 3, 6), (15, 11, 14),
];

// Fill-colored single pixels inside the outline.
const FILL_POINTS: &[(u8, u8)] = &[(8, 9), (8, 5), (2, 13), (14, 13)];

/// Outline pixels that read as stray noise next to the eliminated mark;
/// [`soften_face_edges`] knocks them back to the fill color.
pub const FACE_SOFT_SPOTS: [(u8, u8); 3] = [(6, 9), (11, 13), (12, 14)];

fn out_of_range<D: QuadDisplays>(displays: &D, quad: usize) -> bool {
    quad >= displays.quad_count()
}

/// Set every visible cell to one color. Turn pixels stay off.
pub fn fill<D: QuadDisplays>(displays: &mut D, quad: usize, color: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    for row in 0..VISIBLE_ROWS {
        for col in 0..VISIBLE_COLS {
            displays.set(quad, Layout::index(col, row), color);
        }
    }
    displays.flush(quad);
}

/// Clear the quadrant and push the empty buffer.
pub fn blank<D: QuadDisplays>(displays: &mut D, quad: usize) {
    if out_of_range(displays, quad) {
        return;
    }
    displays.clear(quad);
    displays.flush(quad);
}

/// Light `rows` complete visible rows from the bottom up, clipped to the
/// visible row count.
pub fn draw_progress<D: QuadDisplays>(displays: &mut D, quad: usize, rows: u8, color: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    displays.clear(quad);
    let rows = usize::from(rows).min(VISIBLE_ROWS);
    for row in 0..rows {
        for col in 0..VISIBLE_COLS {
            displays.set(quad, Layout::index(col, row), color);
        }
    }
    displays.flush(quad);
}

/// Jar border plus up to `rows` interior rows of fill, in a single pass.
pub fn draw_jar_with_fill<D: QuadDisplays>(
    displays: &mut D,
    quad: usize,
    rows: u8,
    border: RGB8,
    fill: RGB8,
) {
    if out_of_range(displays, quad) {
        return;
    }
    displays.clear(quad);
    paint_border(displays, quad, border);
    paint_interior(displays, quad, rows, fill);
    displays.flush(quad);
}

/// Jar border only: left, right, and bottom edges, two cells thick.
pub fn draw_jar_border<D: QuadDisplays>(displays: &mut D, quad: usize, border: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    displays.clear(quad);
    paint_border(displays, quad, border);
    displays.flush(quad);
}

/// Interior fill on its own, for when the border is already on screen.
pub fn draw_fill_interior<D: QuadDisplays>(displays: &mut D, quad: usize, rows: u8, color: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    paint_interior(displays, quad, rows, color);
    displays.flush(quad);
}

fn paint_border<D: QuadDisplays>(displays: &mut D, quad: usize, border: RGB8) {
    // Left and right walls, two columns each, full height.
    for row in 0..VISIBLE_ROWS {
        for col in [0, 1, VISIBLE_COLS - 2, VISIBLE_COLS - 1] {
            displays.set(quad, Layout::index(col, row), border);
        }
    }
    // Floor, two rows, full width.
    for row in 0..2 {
        for col in 0..VISIBLE_COLS {
            displays.set(quad, Layout::index(col, row), border);
        }
    }
}

fn paint_interior<D: QuadDisplays>(displays: &mut D, quad: usize, rows: u8, fill: RGB8) {
    let rows = usize::from(rows.min(INTERIOR_ROWS));
    for row in 2..2 + rows {
        for col in 2..VISIBLE_COLS - 2 {
            displays.set(quad, Layout::index(col, row), fill);
        }
    }
}

/// Draw the mascot face: `outline` strokes over `fill` fur.
pub fn draw_face<D: QuadDisplays>(displays: &mut D, quad: usize, outline: RGB8, fill: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    displays.clear(quad);
    for &(col, row) in OUTLINE_POINTS {
        displays.set(quad, Layout::index(usize::from(col), usize::from(row)), outline);
    }
    for &(row, first, last) in FILL_RUNS {
        for col in first..last {
            displays.set(quad, Layout::index(usize::from(col), usize::from(row)), fill);
        }
    }
    for &(col, row) in FILL_POINTS {
        displays.set(quad, Layout::index(usize::from(col), usize::from(row)), fill);
    }
    displays.flush(quad);
}

/// Knock the [`FACE_SOFT_SPOTS`] back to the fill color where they are still
/// outline-colored.
pub fn soften_face_edges<D: QuadDisplays>(displays: &mut D, quad: usize, outline: RGB8, fill: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    for &(col, row) in &FACE_SOFT_SPOTS {
        let index = Layout::index(usize::from(col), usize::from(row));
        if displays.get(quad, index) == outline {
            displays.set(quad, index, fill);
        }
    }
    displays.flush(quad);
}

/// Diagonal cross on a cleared quadrant.
pub fn draw_cross<D: QuadDisplays>(displays: &mut D, quad: usize, color: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    displays.clear(quad);
    paint_cross(displays, quad, color);
    displays.flush(quad);
}

/// Diagonal cross painted over whatever is already in the buffer.
pub fn overlay_cross<D: QuadDisplays>(displays: &mut D, quad: usize, color: RGB8) {
    if out_of_range(displays, quad) {
        return;
    }
    paint_cross(displays, quad, color);
    displays.flush(quad);
}

fn paint_cross<D: QuadDisplays>(displays: &mut D, quad: usize, color: RGB8) {
    for row in 0..VISIBLE_ROWS {
        for col in 0..VISIBLE_COLS {
            let main = col as i32 - row as i32;
            let anti = col as i32 + row as i32 - (VISIBLE_ROWS as i32 - 1);
            // Both diagonals drawn three cells thick.
            if main.abs() <= 1 || anti.abs() <= 1 {
                displays.set(quad, Layout::index(col, row), color);
            }
        }
    }
}

/// Blue depth gradient: dim at the bottom row, full brightness at the top.
pub fn draw_blue_gradient<D: QuadDisplays>(displays: &mut D, quad: usize) {
    if out_of_range(displays, quad) {
        return;
    }
    for row in 0..VISIBLE_ROWS {
        let level = gradient_level(row);
        for col in 0..VISIBLE_COLS {
            displays.set(quad, Layout::index(col, row), RGB8 { r: 0, g: 0, b: level });
        }
    }
    displays.flush(quad);
}

fn gradient_level(row: usize) -> u8 {
    let span = u32::from(GRADIENT_CEIL - GRADIENT_FLOOR);
    let step = span * row as u32 / (VISIBLE_ROWS as u32 - 1);
    GRADIENT_FLOOR.saturating_add(step as u8)
}

/// One full hue revolution spread across the quadrant, offset by `first_hue`.
pub fn draw_rainbow<D: QuadDisplays>(displays: &mut D, quad: usize, first_hue: u16) {
    if out_of_range(displays, quad) {
        return;
    }
    let step = u16::MAX / CELLS;
    let mut hue = first_hue;
    for row in 0..VISIBLE_ROWS {
        for col in 0..VISIBLE_COLS {
            let color = hsv2rgb(Hsv { hue: (hue >> 8) as u8, sat: 255, val: 255 });
            displays.set(quad, Layout::index(col, row), color);
            hue = hue.wrapping_add(step);
        }
    }
    displays.flush(quad);
}

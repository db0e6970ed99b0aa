//! Host-level tests for the quadrant drawing primitives.

mod support;

use prop_kit::constants::{INTERIOR_ROWS, QUAD_COUNT, VISIBLE_COLS, VISIBLE_ROWS};
use prop_kit::layout::Layout;
use prop_kit::render;
use smart_leds::RGB8;
use support::{MockQuads, OFF};

const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
const TEAL: RGB8 = RGB8 { r: 0, g: 128, b: 128 };
const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
const BROWN: RGB8 = RGB8 { r: 15, g: 8, b: 0 };

#[test]
fn fill_covers_every_visible_cell_and_flushes_once() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::fill(&mut quads, 0, TEAL);
    assert_eq!(quads.count_visible(0, TEAL), VISIBLE_ROWS * VISIBLE_COLS);
    assert_eq!(quads.flush_count(0), 1);
}

#[test]
fn fill_never_touches_turn_pixels() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::fill(&mut quads, 0, TEAL);
    for row in 0..VISIBLE_ROWS {
        assert_eq!(quads.raw(0, Layout::turn_index(row)), OFF);
    }
}

#[test]
fn invalid_quadrant_is_a_no_op() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::fill(&mut quads, 7, TEAL);
    render::draw_cross(&mut quads, QUAD_COUNT, RED);
    render::blank(&mut quads, usize::MAX);
    assert_eq!(quads.total_flushes(), 0);
}

#[test]
fn progress_fills_rows_from_the_bottom() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_progress(&mut quads, 1, 3, TEAL);
    for row in 0..3 {
        for col in 0..VISIBLE_COLS {
            assert_eq!(quads.cell(1, col, row), TEAL);
        }
    }
    assert_eq!(quads.count_visible(1, TEAL), 3 * VISIBLE_COLS);
    assert_eq!(quads.flush_count(1), 1);
}

#[test]
fn progress_clips_to_the_visible_rows() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_progress(&mut quads, 0, 200, TEAL);
    assert_eq!(quads.count_visible(0, TEAL), VISIBLE_ROWS * VISIBLE_COLS);
}

#[test]
fn jar_border_is_two_cells_thick_on_three_sides() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_jar_border(&mut quads, 0, TEAL);
    // Walls.
    for row in 0..VISIBLE_ROWS {
        for col in [0, 1, VISIBLE_COLS - 2, VISIBLE_COLS - 1] {
            assert_eq!(quads.cell(0, col, row), TEAL);
        }
    }
    // Floor.
    for col in 0..VISIBLE_COLS {
        assert_eq!(quads.cell(0, col, 0), TEAL);
        assert_eq!(quads.cell(0, col, 1), TEAL);
    }
    // The rim stays open and the interior stays dark.
    assert_eq!(quads.cell(0, 9, VISIBLE_ROWS - 1), OFF);
    assert_eq!(quads.cell(0, 9, 5), OFF);
    assert_eq!(quads.flush_count(0), 1);
}

#[test]
fn jar_fill_occupies_the_interior_and_clamps() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_jar_with_fill(&mut quads, 0, 3, TEAL, RED);
    let interior_cols = VISIBLE_COLS - 4;
    assert_eq!(quads.count_visible(0, RED), 3 * interior_cols);
    // Fill starts above the floor and inside the walls.
    assert_eq!(quads.cell(0, 2, 2), RED);
    assert_eq!(quads.cell(0, 1, 2), TEAL);
    assert_eq!(quads.cell(0, 2, 1), TEAL);
    assert_eq!(quads.flush_count(0), 1);

    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_jar_with_fill(&mut quads, 0, 200, TEAL, RED);
    assert_eq!(
        quads.count_visible(0, RED),
        usize::from(INTERIOR_ROWS) * interior_cols
    );
}

#[test]
fn interior_fill_leaves_the_border_untouched() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_jar_border(&mut quads, 0, TEAL);
    render::draw_fill_interior(&mut quads, 0, 5, RED);
    assert_eq!(quads.cell(0, 0, 7), TEAL);
    assert_eq!(quads.cell(0, 5, 3), RED);
    assert_eq!(quads.flush_count(0), 2);
}

#[test]
fn face_draws_outline_and_fur() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_face(&mut quads, 2, WHITE, BROWN);
    // Eyes are outline-colored; the snout center is fur.
    assert_eq!(quads.cell(2, 6, 11), WHITE);
    assert_eq!(quads.cell(2, 10, 11), WHITE);
    assert_eq!(quads.cell(2, 8, 9), BROWN);
    assert!(quads.count_visible(2, BROWN) > 100);
    assert_eq!(quads.flush_count(2), 1);
}

#[test]
fn soften_face_edges_dims_only_outline_colored_spots() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_face(&mut quads, 2, WHITE, BROWN);
    for &(col, row) in &render::FACE_SOFT_SPOTS {
        assert_eq!(quads.cell(2, usize::from(col), usize::from(row)), WHITE);
    }
    render::soften_face_edges(&mut quads, 2, WHITE, BROWN);
    for &(col, row) in &render::FACE_SOFT_SPOTS {
        assert_eq!(quads.cell(2, usize::from(col), usize::from(row)), BROWN);
    }
}

#[test]
fn cross_covers_both_diagonals_three_cells_thick() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_cross(&mut quads, 3, RED);
    for step in 0..VISIBLE_ROWS {
        assert_eq!(quads.cell(3, step, step), RED);
        assert_eq!(quads.cell(3, step, VISIBLE_ROWS - 1 - step), RED);
    }
    // One off the diagonal is still inside the stroke; three off is not.
    assert_eq!(quads.cell(3, 5, 4), RED);
    assert_eq!(quads.cell(3, 8, 2), OFF);
}

#[test]
fn overlay_cross_preserves_the_background() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::fill(&mut quads, 3, TEAL);
    render::overlay_cross(&mut quads, 3, RED);
    assert_eq!(quads.cell(3, 0, 0), RED);
    assert_eq!(quads.cell(3, 8, 2), TEAL);
}

#[test]
fn blue_gradient_brightens_toward_the_top_row() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_blue_gradient(&mut quads, 0);
    assert_eq!(quads.cell(0, 4, 0), RGB8 { r: 0, g: 0, b: 50 });
    assert_eq!(quads.cell(0, 4, VISIBLE_ROWS - 1), RGB8 { r: 0, g: 0, b: 255 });
    let mut previous = 0;
    for row in 0..VISIBLE_ROWS {
        let level = quads.cell(0, 0, row).b;
        assert!(level >= previous, "gradient dipped at row {row}");
        previous = level;
    }
}

#[test]
fn rainbow_lights_every_visible_cell() {
    let mut quads = MockQuads::new(QUAD_COUNT);
    render::draw_rainbow(&mut quads, 0, 0);
    assert_eq!(quads.count_visible(0, OFF), 0);
    assert_eq!(quads.flush_count(0), 1);
    // A different wheel offset shifts the colors.
    let first = quads.cell(0, 0, 0);
    render::draw_rainbow(&mut quads, 0, 0x8000);
    assert_ne!(quads.cell(0, 0, 0), first);
}

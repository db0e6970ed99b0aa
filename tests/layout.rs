//! Host-level tests for the quadrant geometry mapping.

use std::collections::HashSet;

use prop_kit::constants::{LEDS_PER_QUAD, PHYS_COLS, VISIBLE_COLS, VISIBLE_ROWS};
use prop_kit::layout::{Layout, QuadLayout};

#[test]
fn even_rows_run_left_to_right() {
    assert_eq!(Layout::index(0, 0), 0);
    assert_eq!(Layout::index(1, 0), 1);
    assert_eq!(Layout::index(17, 0), 17);
    assert_eq!(Layout::index(0, 2), 2 * PHYS_COLS);
}

#[test]
fn odd_rows_run_right_to_left_and_skip_the_turn_pixel() {
    // Row 1 starts at physical index 19; its turn pixel is index 37.
    assert_eq!(Layout::index(0, 1), PHYS_COLS + (PHYS_COLS - 2));
    assert_eq!(Layout::index(17, 1), PHYS_COLS);
    assert_eq!(Layout::turn_index(1), 2 * PHYS_COLS - 1);
}

#[test]
fn out_of_range_maps_to_safe_default() {
    assert_eq!(Layout::index(VISIBLE_COLS, 0), 0);
    assert_eq!(Layout::index(0, VISIBLE_ROWS), 0);
    assert_eq!(Layout::index(usize::MAX, usize::MAX), 0);
}

#[test]
fn mapping_is_a_bijection_excluding_every_turn_index() {
    let mut seen = HashSet::new();
    for row in 0..VISIBLE_ROWS {
        for col in 0..VISIBLE_COLS {
            let index = Layout::index(col, row);
            assert!(index < LEDS_PER_QUAD);
            assert!(!Layout::is_turn(index), "cell ({col},{row}) landed on a turn pixel");
            assert!(seen.insert(index), "cell ({col},{row}) collided at index {index}");
        }
    }
    assert_eq!(seen.len(), VISIBLE_ROWS * VISIBLE_COLS);
    for row in 0..VISIBLE_ROWS {
        assert!(!seen.contains(&Layout::turn_index(row)));
    }
}

#[test]
fn holds_for_other_grid_sizes() {
    type Small = QuadLayout<4, 5>;
    assert!(Small::maps_distinct_cells());

    let mut seen = HashSet::new();
    for row in 0..Small::VISIBLE_ROWS {
        for col in 0..Small::VISIBLE_COLS {
            assert!(seen.insert(Small::index(col, row)));
        }
    }
    assert_eq!(seen.len(), 4 * 4);

    // Spot-check the serpentine turn on the 4×5 grid.
    assert_eq!(Small::index(0, 1), 5 + 3);
    assert_eq!(Small::index(3, 1), 5);
}

#[test]
fn turn_detection_matches_turn_indices() {
    for row in 0..VISIBLE_ROWS {
        assert!(Layout::is_turn(Layout::turn_index(row)));
    }
    assert!(!Layout::is_turn(0));
    assert!(!Layout::is_turn(PHYS_COLS));
}

//! Random transient pixel flashes on the two top quadrants.
//!
//! On a fixed tick cadence a handful of random candidate pixels each get a
//! small chance to light up in a random color; a flashed pixel is restored to
//! exactly its saved color once its duration elapses. Deliberate redraws must
//! call [`FlashTable::forget`] for the pixels they touch so a pending restore
//! cannot revert them.

use embassy_time::{Duration, Instant};
use smart_leds::RGB8;

use crate::constants::{LEDS_PER_QUAD, TOP_LEFT, TOP_RIGHT, VISIBLE_COLS, VISIBLE_ROWS};
use crate::display::QuadDisplays;
use crate::layout::Layout;
use crate::rng::Rng;

/// How often new flashes are attempted.
pub const FLASH_TICK: Duration = Duration::from_millis(100);
/// How long a flash lasts before its pixel is restored.
pub const FLASH_DURATION: Duration = Duration::from_millis(300);
/// Random candidates examined per tick.
const ATTEMPTS_PER_TICK: usize = 30;
/// Each candidate starts a flash one time in this many.
const START_ODDS: u32 = 8;

#[derive(Copy, Clone)]
struct Flash {
    active: bool,
    saved: RGB8,
    end: Instant,
}

const VACANT: Flash = Flash {
    active: false,
    saved: RGB8 { r: 0, g: 0, b: 0 },
    end: Instant::from_ticks(0),
};

/// Per-pixel flash records for the two top quadrants.
pub struct FlashTable {
    entries: [Flash; 2 * LEDS_PER_QUAD],
    next_tick: Instant,
}

impl FlashTable {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: [VACANT; 2 * LEDS_PER_QUAD], next_tick: Instant::from_ticks(0) }
    }

    /// Drop every record; the next tick may start fresh flashes immediately.
    pub fn reset(&mut self) {
        self.entries = [VACANT; 2 * LEDS_PER_QUAD];
        self.next_tick = Instant::from_ticks(0);
    }

    fn slot(quad: usize, index: usize) -> Option<usize> {
        let bank = match quad {
            TOP_LEFT => 0,
            TOP_RIGHT => 1,
            _ => return None,
        };
        if index >= LEDS_PER_QUAD {
            return None;
        }
        Some(bank * LEDS_PER_QUAD + index)
    }

    /// Forget any pending restore for a pixel a deliberate draw just painted.
    pub fn forget(&mut self, quad: usize, index: usize) {
        if let Some(slot) = Self::slot(quad, index) {
            self.entries[slot] = VACANT;
        }
    }

    /// On the tick cadence, roll the candidate pixels and start new flashes.
    /// Quadrants that gained a flash are flushed once.
    pub fn try_start<D: QuadDisplays>(&mut self, displays: &mut D, rng: &mut Rng, now: Instant) {
        if now < self.next_tick {
            return;
        }
        self.next_tick = now + FLASH_TICK;

        let mut dirty = [false; 2];
        for _ in 0..ATTEMPTS_PER_TICK {
            let quad = if rng.chance(2) { TOP_LEFT } else { TOP_RIGHT };
            let col = rng.range(0, VISIBLE_COLS as u32) as usize;
            let row = rng.range(0, VISIBLE_ROWS as u32) as usize;
            let index = Layout::index(col, row);
            let Some(slot) = Self::slot(quad, index) else {
                continue;
            };
            if self.entries[slot].active {
                continue;
            }
            if !rng.chance(START_ODDS) {
                continue;
            }
            let saved = displays.get(quad, index);
            let roll = rng.next();
            displays.set(
                quad,
                index,
                RGB8 { r: (roll >> 16) as u8, g: (roll >> 8) as u8, b: roll as u8 },
            );
            self.entries[slot] = Flash { active: true, saved, end: now + FLASH_DURATION };
            dirty[quad] = true;
        }
        for (quad, changed) in dirty.into_iter().enumerate() {
            if changed {
                displays.flush(quad);
            }
        }
    }

    /// Restore every expired flash, flushing only quadrants that changed.
    pub fn restore_expired<D: QuadDisplays>(&mut self, displays: &mut D, now: Instant) {
        let mut dirty = [false; 2];
        for (slot, entry) in self.entries.iter_mut().enumerate() {
            if !entry.active || now < entry.end {
                continue;
            }
            let quad = if slot < LEDS_PER_QUAD { TOP_LEFT } else { TOP_RIGHT };
            displays.set(quad, slot % LEDS_PER_QUAD, entry.saved);
            *entry = VACANT;
            dirty[quad] = true;
        }
        for (quad, changed) in dirty.into_iter().enumerate() {
            if changed {
                displays.flush(quad);
            }
        }
    }
}

impl Default for FlashTable {
    fn default() -> Self {
        Self::new()
    }
}

//! Shared mock drivers for the host tests: in-memory quadrant buffers, a
//! scriptable beam bank, and a scriptable remote with the latching contract.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_time::Instant;
use prop_kit::constants::{LEDS_PER_QUAD, VISIBLE_COLS, VISIBLE_ROWS};
use prop_kit::layout::Layout;
use prop_kit::remote::{Receiver, RemoteFrame};
use prop_kit::{BeamSensors, QuadDisplays};
use smart_leds::RGB8;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

// Handset command bytes used by the tests.
pub const CMD_CH_MINUS: u8 = 0x45;
pub const CMD_CH_PLUS: u8 = 0x47;
pub const CMD_ZERO: u8 = 0x16;
pub const CMD_ONE: u8 = 0x0C;
pub const CMD_TWO: u8 = 0x18;
pub const CMD_THREE: u8 = 0x5E;
pub const CMD_SEVEN: u8 = 0x42;
pub const CMD_EIGHT: u8 = 0x52;
pub const CMD_NINE: u8 = 0x4A;
pub const CMD_PREV: u8 = 0x44;
pub const CMD_NEXT: u8 = 0x40;
pub const CMD_PAUSE: u8 = 0x43;
pub const CMD_EQ: u8 = 0x19;

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

// ===== Displays =============================================================

/// In-memory quadrant buffers with flush counting.
pub struct MockQuads {
    frames: Vec<[RGB8; LEDS_PER_QUAD]>,
    flushes: Vec<usize>,
}

impl MockQuads {
    pub fn new(count: usize) -> Self {
        Self {
            frames: vec![[OFF; LEDS_PER_QUAD]; count],
            flushes: vec![0; count],
        }
    }

    /// Buffered color of a visible cell.
    pub fn cell(&self, quad: usize, col: usize, row: usize) -> RGB8 {
        self.frames[quad][Layout::index(col, row)]
    }

    /// Buffered color by physical index.
    pub fn raw(&self, quad: usize, index: usize) -> RGB8 {
        self.frames[quad][index]
    }

    pub fn flush_count(&self, quad: usize) -> usize {
        self.flushes[quad]
    }

    pub fn total_flushes(&self) -> usize {
        self.flushes.iter().sum()
    }

    /// Number of visible cells currently showing `color`.
    pub fn count_visible(&self, quad: usize, color: RGB8) -> usize {
        let mut count = 0;
        for row in 0..VISIBLE_ROWS {
            for col in 0..VISIBLE_COLS {
                if self.cell(quad, col, row) == color {
                    count += 1;
                }
            }
        }
        count
    }

    /// True when every visible cell of the quadrant is off.
    pub fn is_blank(&self, quad: usize) -> bool {
        self.count_visible(quad, OFF) == VISIBLE_ROWS * VISIBLE_COLS
    }

    /// True when every cell of `col` shows `color`.
    pub fn column_is(&self, quad: usize, col: usize, color: RGB8) -> bool {
        (0..VISIBLE_ROWS).all(|row| self.cell(quad, col, row) == color)
    }
}

impl QuadDisplays for MockQuads {
    fn quad_count(&self) -> usize {
        self.frames.len()
    }

    fn set(&mut self, quad: usize, index: usize, color: RGB8) {
        if let Some(pixel) = self.frames.get_mut(quad).and_then(|frame| frame.get_mut(index)) {
            *pixel = color;
        }
    }

    fn get(&self, quad: usize, index: usize) -> RGB8 {
        self.frames
            .get(quad)
            .and_then(|frame| frame.get(index))
            .copied()
            .unwrap_or(OFF)
    }

    fn clear(&mut self, quad: usize) {
        if let Some(frame) = self.frames.get_mut(quad) {
            *frame = [OFF; LEDS_PER_QUAD];
        }
    }

    fn flush(&mut self, quad: usize) {
        if let Some(count) = self.flushes.get_mut(quad) {
            *count += 1;
        }
    }
}

// ===== Beams ================================================================

/// Scriptable beam levels; clones share state so tests can flip lines while
/// the engine owns the sensor.
#[derive(Clone, Default)]
pub struct MockBeams(Rc<RefCell<[bool; 4]>>);

impl MockBeams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_broken(&self, index: usize, broken: bool) {
        self.0.borrow_mut()[index] = broken;
    }
}

impl BeamSensors for MockBeams {
    fn is_high(&mut self, index: usize) -> bool {
        self.0.borrow().get(index).copied().unwrap_or(false)
    }
}

// ===== Remote ===============================================================

struct RemoteState {
    queue: VecDeque<RemoteFrame>,
    idle: bool,
    latched: bool,
    resumes: usize,
}

/// Scriptable remote implementing the latching receiver contract.
#[derive(Clone)]
pub struct MockRemote(Rc<RefCell<RemoteState>>);

impl MockRemote {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(RemoteState {
            queue: VecDeque::new(),
            idle: true,
            latched: false,
            resumes: 0,
        })))
    }

    /// Queue a press from the standard handset address.
    pub fn press(&self, cmd: u8) {
        self.press_at(0x00, cmd);
    }

    pub fn press_at(&self, addr: u8, cmd: u8) {
        self.0.borrow_mut().queue.push_back(RemoteFrame::Press { addr, cmd });
    }

    /// Queue a repeat tail.
    pub fn repeat(&self) {
        self.0.borrow_mut().queue.push_back(RemoteFrame::Repeat);
    }

    pub fn set_idle(&self, idle: bool) {
        self.0.borrow_mut().idle = idle;
    }

    pub fn resume_count(&self) -> usize {
        self.0.borrow().resumes
    }
}

impl Receiver for MockRemote {
    fn poll(&mut self) -> Option<RemoteFrame> {
        let mut state = self.0.borrow_mut();
        if state.latched {
            return None;
        }
        let frame = state.queue.pop_front()?;
        state.latched = true;
        Some(frame)
    }

    fn is_idle(&self) -> bool {
        self.0.borrow().idle
    }

    fn resume(&mut self) {
        let mut state = self.0.borrow_mut();
        state.latched = false;
        state.resumes += 1;
    }
}

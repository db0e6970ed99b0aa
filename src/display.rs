//! Output-device contract for the quadrant displays.

use smart_leds::RGB8;

/// One owned pixel buffer per quadrant, flushed on demand.
///
/// Implementations own the buffers and the wire protocol; callers address
/// pixels by `(quadrant, physical index)`. Writes outside the implementation's
/// quadrant or pixel range are ignored, never an error: a geometry mismatch
/// downgrades to missing pixels instead of a fault.
pub trait QuadDisplays {
    /// Number of quadrants actually connected.
    fn quad_count(&self) -> usize;

    /// Write one pixel into a quadrant's buffer.
    fn set(&mut self, quad: usize, index: usize, color: RGB8);

    /// Read back a buffered color (off for out-of-range reads).
    fn get(&self, quad: usize, index: usize) -> RGB8;

    /// Reset every pixel of a quadrant's buffer to off.
    fn clear(&mut self, quad: usize);

    /// Push a quadrant's buffer to the device.
    fn flush(&mut self, quad: usize);
}

//! Small xorshift PRNG for effect randomness.

/// Xorshift32. Effect timing and colors only; not cryptographic.
pub struct Rng(u32);

impl Rng {
    /// A zero seed would lock the generator at zero, so it is remapped.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    pub fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    /// Value in `lo..hi`.
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo < hi);
        lo + self.next() % (hi - lo)
    }

    /// True once per `one_in` calls on average.
    pub fn chance(&mut self, one_in: u32) -> bool {
        self.next() % one_in == 0
    }
}

//! Per-quadrant animation state and the cooperative toggle scheduler.
//!
//! Each quadrant carries its own deadlines; the control loop calls
//! [`QuadAnim::step`] once per iteration and performs whatever drawing the
//! returned [`Toggle`] asks for. Timing lives here, pixels live in the
//! renderer, so the scheduler is testable with a synthetic clock.

use embassy_time::{Duration, Instant};

use crate::rng::Rng;

/// Flicker cadence tiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tier {
    Normal,
    Fast,
}

// Sustained toggle intervals per tier, in milliseconds.
const NORMAL_SUSTAIN_MS: (u32, u32) = (300, 600);
const FAST_SUSTAIN_MS: (u32, u32) = (20, 100);
// Shorter seed intervals so the first toggle lands soon after arming.
const NORMAL_SEED_MS: (u32, u32) = (100, 400);
const FAST_SEED_MS: (u32, u32) = (20, 80);

impl Tier {
    /// Delay until the first toggle after a selector arms this tier.
    pub fn seed_interval(self, rng: &mut Rng) -> Duration {
        let (lo, hi) = match self {
            Self::Normal => NORMAL_SEED_MS,
            Self::Fast => FAST_SEED_MS,
        };
        Duration::from_millis(u64::from(rng.range(lo, hi)))
    }

    /// Delay between toggles once the flicker is running.
    pub fn sustain_interval(self, rng: &mut Rng) -> Duration {
        let (lo, hi) = match self {
            Self::Normal => NORMAL_SUSTAIN_MS,
            Self::Fast => FAST_SUSTAIN_MS,
        };
        Duration::from_millis(u64::from(rng.range(lo, hi)))
    }
}

/// Number of toggles in the scripted lose sequence.
pub const LOSE_TOGGLES: u8 = 10;
/// Fixed toggle interval of the scripted lose sequence.
pub const LOSE_INTERVAL: Duration = Duration::from_millis(50);

/// Scripted lose sequence in flight.
#[derive(Copy, Clone, Debug)]
pub struct LoseSeq {
    pub toggles_done: u8,
    pub next_toggle: Instant,
}

/// What the scheduler asks the caller to draw after a step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// Show the quadrant's glyph.
    Show,
    /// Blank the quadrant.
    Hide,
    /// The lose sequence just finished: draw the terminal eliminated visual.
    Eliminated,
}

/// Animation state for one quadrant.
///
/// Invariant: at most one cadence source is live at a time — a running lose
/// sequence preempts the flicker tier, and `steady` suppresses the tier even
/// when one remains set.
#[derive(Copy, Clone, Debug)]
pub struct QuadAnim {
    /// Selected flicker tier, if any.
    pub tier: Option<Tier>,
    /// Steady quadrants hold their visual and never toggle.
    pub steady: bool,
    /// Whether the glyph is currently shown.
    pub visible: bool,
    /// Deadline for the next tier-driven toggle.
    pub next_toggle: Instant,
    /// Scripted lose sequence, when one is running.
    pub lose: Option<LoseSeq>,
    /// A locked quadrant keeps its visual no matter what the timers say.
    pub locked: bool,
}

impl QuadAnim {
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            tier: None,
            steady: false,
            visible: true,
            next_toggle: Instant::from_ticks(0),
            lose: None,
            locked: false,
        }
    }

    /// Reset every animation flag that exists in the model. Entry actions
    /// call this so no stale cadence leaks into the next mode.
    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    /// Selector applying an armed flicker: pick the tier and seed the first
    /// toggle deadline.
    pub fn start_flicker(&mut self, tier: Tier, now: Instant, rng: &mut Rng) {
        self.tier = Some(tier);
        self.steady = false;
        self.visible = true;
        self.next_toggle = now + tier.seed_interval(rng);
    }

    /// Selector applying an armed steady: hold the glyph and stop toggling.
    pub fn hold_steady(&mut self) {
        self.tier = None;
        self.steady = true;
        self.visible = true;
    }

    /// Drop the flicker tier without touching steadiness.
    pub fn stop_flicker(&mut self) {
        self.tier = None;
    }

    /// Begin (or restart) the scripted lose sequence from toggle 0.
    pub fn start_lose(&mut self, now: Instant) {
        self.lose = Some(LoseSeq { toggles_done: 0, next_toggle: now + LOSE_INTERVAL });
        self.tier = None;
        self.steady = false;
        self.visible = true;
    }

    /// Advance this quadrant's timers. Returns the draw the caller owes, if
    /// a deadline fired.
    pub fn step(&mut self, now: Instant, rng: &mut Rng) -> Option<Toggle> {
        if let Some(mut seq) = self.lose {
            if now < seq.next_toggle {
                return None;
            }
            self.visible = !self.visible;
            seq.toggles_done += 1;
            seq.next_toggle = now + LOSE_INTERVAL;
            if seq.toggles_done >= LOSE_TOGGLES {
                // Terminal: every cadence flag off, eliminated visual stays.
                self.lose = None;
                self.tier = None;
                self.steady = false;
                return Some(Toggle::Eliminated);
            }
            self.lose = Some(seq);
            return Some(if self.visible { Toggle::Show } else { Toggle::Hide });
        }

        let tier = self.tier?;
        if self.steady || now < self.next_toggle {
            return None;
        }
        self.visible = !self.visible;
        self.next_toggle = now + tier.sustain_interval(rng);
        Some(if self.visible { Toggle::Show } else { Toggle::Hide })
    }
}

impl Default for QuadAnim {
    fn default() -> Self {
        Self::idle()
    }
}

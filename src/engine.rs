//! The mode state machine and the body of the control loop.
//!
//! One [`Engine`] owns all shared state plus the three collaborator drivers.
//! The firmware calls [`Engine::tick`] from a single cooperative loop; each
//! tick polls the remote first (so a mode switch lands the same iteration),
//! then runs the pending one-shot entry action if the receiver is idle, then
//! the current mode's per-tick update.

use embassy_time::{Duration, Instant};
use smart_leds::RGB8;

use crate::anim::{QuadAnim, Tier, Toggle};
use crate::beams::{BeamBank, BeamSensors};
use crate::constants::{
    BOTTOM_LEFT, BOTTOM_RIGHT, LEDS_PER_QUAD, QUAD_COUNT, TOP_LEFT, TOP_RIGHT, VISIBLE_COLS,
    VISIBLE_ROWS,
};
use crate::display::QuadDisplays;
use crate::flashes::FlashTable;
use crate::layout::Layout;
use crate::remote::{Button, ButtonMap, Receiver, RemoteFrame};
use crate::render;
use crate::rng::Rng;
use crate::rounds::{JAR_BORDER, JAR_FILL, RoundScore};

/// Top-level game modes selected from the remote.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Off,
    Intro,
    Round1,
    Round2,
    Round3,
    Round4,
    Finale,
}

/// The pending action the next selector button will apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Armed {
    Steady,
    Flicker,
    FastFlicker,
}

/// Column color tags for the conversion round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColumnTag {
    Blue,
    Green,
}

/// Face outline color.
pub const FACE_OUTLINE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
/// Face fur color.
pub const FACE_FILL: RGB8 = RGB8 { r: 15, g: 8, b: 0 };
/// Warning cross color.
pub const CROSS: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
/// Converted-column color.
pub const COLUMN_BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
/// Unconverted-column color.
pub const COLUMN_GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };

// Hue wheel advance per tick.
const INTRO_HUE_STEP: u16 = 3000;
const FINALE_HUE_STEP: u16 = 100;

/// How long the gradient holds on screen while entering the flicker round.
const ROUND2_HOLD: Duration = Duration::from_millis(1000);

/// Loop pacing: the normal pause between ticks, and the short one used while
/// a lose sequence needs 50 ms toggle precision.
const IDLE_DELAY: Duration = Duration::from_millis(10);
const LOSE_DELAY: Duration = Duration::from_millis(1);

/// The whole prop: drivers plus every piece of shared scheduler state.
pub struct Engine<D, B, R> {
    displays: D,
    sensors: B,
    receiver: R,
    buttons: ButtonMap,
    rng: Rng,
    mode: Mode,
    /// The one-shot entry action for `mode` has not run yet. Kept pending
    /// (never skipped) while the receiver is busy.
    entry_pending: bool,
    /// Second half of the Round2 entry: when the gradient hold ends.
    round2_hold: Option<Instant>,
    armed: Option<Armed>,
    last_button: Option<Button>,
    quads: [QuadAnim; QUAD_COUNT],
    beams: BeamBank<QUAD_COUNT>,
    score: RoundScore,
    flashes: FlashTable,
    /// Column tags for the two top quadrants, indexed `[TOP_LEFT, TOP_RIGHT]`.
    columns: [[ColumnTag; VISIBLE_COLS]; 2],
    hue: u16,
}

impl<D, B, R> Engine<D, B, R>
where
    D: QuadDisplays,
    B: BeamSensors,
    R: Receiver,
{
    /// Build the engine around its drivers. The first tick clears all
    /// quadrants (the Off entry action).
    pub fn new(displays: D, mut sensors: B, receiver: R, seed: u32) -> Self {
        let beams = BeamBank::new(&mut sensors);
        Self {
            displays,
            sensors,
            receiver,
            buttons: ButtonMap::standard(),
            rng: Rng::new(seed),
            mode: Mode::Off,
            entry_pending: true,
            round2_hold: None,
            armed: None,
            last_button: None,
            quads: [QuadAnim::idle(); QUAD_COUNT],
            beams,
            score: RoundScore::new(),
            flashes: FlashTable::new(),
            columns: [[ColumnTag::Blue; VISIBLE_COLS]; 2],
            hue: 0,
        }
    }

    /// One iteration of the control loop.
    pub fn tick(&mut self, now: Instant) {
        self.poll_remote(now);
        self.run_pending_entry(now);
        if !self.entry_pending {
            self.update_mode(now);
        }
    }

    /// Suggested pause before the next tick; short while a lose sequence
    /// needs its 50 ms toggles, so held buttons still get polled in time.
    #[must_use]
    pub fn idle_delay(&self) -> Duration {
        if self.quads.iter().any(|quad| quad.lose.is_some()) {
            LOSE_DELAY
        } else {
            IDLE_DELAY
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn armed(&self) -> Option<Armed> {
        self.armed
    }

    pub fn displays(&self) -> &D {
        &self.displays
    }

    pub fn anim(&self, quad: usize) -> Option<&QuadAnim> {
        self.quads.get(quad)
    }

    pub fn score_rows(&self, quad: usize) -> u8 {
        self.score.rows(quad)
    }

    pub fn column_tag(&self, quad: usize, col: usize) -> Option<ColumnTag> {
        let bank = match quad {
            TOP_LEFT => 0,
            TOP_RIGHT => 1,
            _ => return None,
        };
        self.columns[bank].get(col).copied()
    }

    // ===== Remote =========================================================

    fn poll_remote(&mut self, now: Instant) {
        let Some(frame) = self.receiver.poll() else {
            return;
        };
        let button = match frame {
            RemoteFrame::Press { addr, cmd } => match self.buttons.lookup(addr, cmd) {
                Some(button) => {
                    self.last_button = Some(button);
                    button
                }
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("unknown remote code addr=0x{:02X} cmd=0x{:02X}", addr, cmd);
                    self.receiver.resume();
                    return;
                }
            },
            // A repeat replays the last accepted press. Repeats before any
            // press carry no information and are dropped.
            RemoteFrame::Repeat => match self.last_button {
                Some(button) => button,
                None => {
                    self.receiver.resume();
                    return;
                }
            },
        };
        self.dispatch(button, now);
        // Every accepted path resumes; a missed resume stalls the remote for good.
        self.receiver.resume();
    }

    /// The command→action table over (button, current mode). Mode switches
    /// are unconditional; everything else is conditional on the mode and only
    /// mutates shared state, apart from the instantaneous draws noted below.
    fn dispatch(&mut self, button: Button, now: Instant) {
        #[cfg(feature = "defmt")]
        let mode_before = self.mode;
        match button {
            Button::ChMinus => self.set_mode(Mode::Intro),
            Button::ChPlus | Button::Five => self.set_mode(Mode::Finale),
            Button::Zero => self.set_mode(Mode::Off),
            Button::One => self.set_mode(Mode::Round1),
            Button::Two => {
                // Re-issued inside Round2, this locks the bottom-left
                // quadrant into the warning cross instead of re-entering.
                if self.mode == Mode::Round2 {
                    self.lock_bottom_left();
                } else {
                    self.set_mode(Mode::Round2);
                }
            }
            Button::Three => self.set_mode(Mode::Round3),
            Button::Four => self.set_mode(Mode::Round4),
            Button::Seven => self.arm(Armed::Steady),
            Button::Eight => self.arm(Armed::Flicker),
            Button::Nine => self.arm(Armed::FastFlicker),
            Button::Eq => self.trigger_lose(now),
            Button::Prev => match self.mode {
                Mode::Round3 => self.retreat_column(),
                Mode::Round2 => self.apply_selector(TOP_LEFT, now),
                _ => {}
            },
            Button::Next => match self.mode {
                Mode::Round3 => self.advance_column(),
                Mode::Round2 => self.apply_selector(TOP_RIGHT, now),
                _ => {}
            },
            Button::Pause => {
                if self.mode == Mode::Round2 {
                    self.apply_selector(BOTTOM_RIGHT, now);
                }
            }
        }
        #[cfg(feature = "defmt")]
        if self.mode != mode_before {
            defmt::info!("mode switched: {}", self.mode);
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        // Switching abandons in-flight animations; the entry action resets
        // them once the receiver is idle.
        self.entry_pending = true;
        self.round2_hold = None;
    }

    /// Arm buttons are mutually exclusive: the newest wins.
    fn arm(&mut self, action: Armed) {
        if self.mode != Mode::Round2 {
            return;
        }
        self.armed = Some(action);
        #[cfg(feature = "defmt")]
        defmt::info!("armed: {} (press selectors to apply)", action);
    }

    /// A selector applies whatever is armed to its quadrant and leaves the
    /// arming in place, so one arm press can cover several quadrants.
    fn apply_selector(&mut self, quad: usize, now: Instant) {
        let Some(armed) = self.armed else {
            return;
        };
        match armed {
            Armed::Steady => self.quads[quad].hold_steady(),
            Armed::Flicker => self.quads[quad].start_flicker(Tier::Normal, now, &mut self.rng),
            Armed::FastFlicker => self.quads[quad].start_flicker(Tier::Fast, now, &mut self.rng),
        }
        render::draw_face(&mut self.displays, quad, FACE_OUTLINE, FACE_FILL);
    }

    /// Start the scripted loss on the bottom-right quadrant; every other
    /// quadrant's flicker stops so the sequence stands alone.
    fn trigger_lose(&mut self, now: Instant) {
        if self.mode != Mode::Round2 {
            return;
        }
        let target = BOTTOM_RIGHT;
        for (quad, anim) in self.quads.iter_mut().enumerate() {
            if quad != target {
                anim.stop_flicker();
            }
        }
        self.quads[target].start_lose(now);
        render::draw_face(&mut self.displays, target, FACE_OUTLINE, FACE_FILL);
        render::soften_face_edges(&mut self.displays, target, FACE_OUTLINE, FACE_FILL);
        #[cfg(feature = "defmt")]
        defmt::info!("lose sequence started on quadrant {}", target);
    }

    fn lock_bottom_left(&mut self) {
        self.quads[BOTTOM_LEFT].locked = true;
        self.quads[BOTTOM_LEFT].hold_steady();
        render::draw_cross(&mut self.displays, BOTTOM_LEFT, CROSS);
    }

    // ===== Round3 column conversion ======================================

    /// Convert the first unconverted (green) column to blue, sweeping the
    /// top-left quadrant left→right, then the top-right once it is exhausted.
    fn advance_column(&mut self) {
        for (bank, quad) in [(0, TOP_LEFT), (1, TOP_RIGHT)] {
            for col in 0..VISIBLE_COLS {
                if self.columns[bank][col] == ColumnTag::Green {
                    self.columns[bank][col] = ColumnTag::Blue;
                    self.repaint_column(quad, col, COLUMN_BLUE);
                    return;
                }
            }
        }
    }

    /// The reverse sweep: first blue column back to green, right→left,
    /// top-right before top-left.
    fn retreat_column(&mut self) {
        for (bank, quad) in [(1, TOP_RIGHT), (0, TOP_LEFT)] {
            for col in (0..VISIBLE_COLS).rev() {
                if self.columns[bank][col] == ColumnTag::Blue {
                    self.columns[bank][col] = ColumnTag::Green;
                    self.repaint_column(quad, col, COLUMN_GREEN);
                    return;
                }
            }
        }
    }

    /// One-column repaint. Clears the flash records it touches so a pending
    /// restore cannot revert the conversion.
    fn repaint_column(&mut self, quad: usize, col: usize, color: RGB8) {
        for row in 0..VISIBLE_ROWS {
            let index = Layout::index(col, row);
            self.displays.set(quad, index, color);
            self.flashes.forget(quad, index);
        }
        self.displays.flush(quad);
    }

    // ===== Mode entry =====================================================

    /// Run the pending one-shot entry action, gated on receiver idleness. A
    /// busy receiver defers the action to a later tick; it never runs twice.
    fn run_pending_entry(&mut self, now: Instant) {
        if !self.entry_pending || !self.receiver.is_idle() {
            return;
        }
        if let Some(hold_until) = self.round2_hold {
            if now < hold_until {
                return;
            }
            self.round2_hold = None;
            self.finish_round2_entry();
            self.entry_pending = false;
            return;
        }
        if self.enter(now) {
            self.entry_pending = false;
        }
    }

    /// First step of the entry action. Returns false when the entry
    /// continues on a later tick (the Round2 gradient hold).
    fn enter(&mut self, now: Instant) -> bool {
        match self.mode {
            Mode::Off => {
                self.clear_all();
                true
            }
            Mode::Intro | Mode::Finale => true,
            Mode::Round1 | Mode::Round4 => {
                self.clear_all();
                self.score.reset();
                self.beams.resync(&mut self.sensors);
                true
            }
            Mode::Round2 => {
                for quad in 0..QUAD_COUNT {
                    render::draw_blue_gradient(&mut self.displays, quad);
                }
                self.round2_hold = Some(now + ROUND2_HOLD);
                false
            }
            Mode::Round3 => {
                self.enter_round3();
                true
            }
        }
    }

    fn finish_round2_entry(&mut self) {
        self.clear_all();
        for anim in &mut self.quads {
            anim.reset();
        }
        self.armed = None;
        // Bottom-left shows the warning cross for the rest of the mode.
        self.quads[BOTTOM_LEFT].locked = true;
        self.quads[BOTTOM_LEFT].hold_steady();
        render::draw_cross(&mut self.displays, BOTTOM_LEFT, CROSS);
        for quad in 0..QUAD_COUNT {
            if quad == BOTTOM_LEFT {
                continue;
            }
            render::draw_face(&mut self.displays, quad, FACE_OUTLINE, FACE_FILL);
        }
    }

    fn enter_round3(&mut self) {
        self.clear_all();
        render::fill(&mut self.displays, TOP_LEFT, COLUMN_BLUE);
        render::fill(&mut self.displays, TOP_RIGHT, COLUMN_GREEN);
        render::draw_cross(&mut self.displays, BOTTOM_LEFT, CROSS);
        render::draw_cross(&mut self.displays, BOTTOM_RIGHT, CROSS);
        // Nothing flickers here; all quadrants hold their visual.
        for anim in &mut self.quads {
            anim.reset();
            anim.hold_steady();
        }
        self.columns[0] = [ColumnTag::Blue; VISIBLE_COLS];
        self.columns[1] = [ColumnTag::Green; VISIBLE_COLS];
        self.flashes.reset();
    }

    fn clear_all(&mut self) {
        for quad in 0..QUAD_COUNT {
            render::blank(&mut self.displays, quad);
        }
    }

    // ===== Per-tick updates ==============================================

    fn update_mode(&mut self, now: Instant) {
        match self.mode {
            Mode::Off => {}
            Mode::Intro => self.rainbow_tick(INTRO_HUE_STEP),
            Mode::Finale => self.rainbow_tick(FINALE_HUE_STEP),
            Mode::Round1 | Mode::Round4 => self.round1_tick(),
            Mode::Round2 => self.round2_tick(now),
            Mode::Round3 => self.round3_tick(now),
        }
    }

    fn rainbow_tick(&mut self, step: u16) {
        // Redrawing four quadrants takes long enough to corrupt a frame in
        // flight, so the whole update waits for a quiet line.
        if !self.receiver.is_idle() {
            return;
        }
        self.hue = self.hue.wrapping_add(step);
        for quad in 0..QUAD_COUNT {
            render::draw_rainbow(&mut self.displays, quad, self.hue);
        }
    }

    fn round1_tick(&mut self) {
        if !self.receiver.is_idle() {
            return;
        }
        for quad in 0..QUAD_COUNT {
            if self.beams.broke(&mut self.sensors, quad) {
                self.score.record_break(quad);
            }
            render::draw_jar_with_fill(
                &mut self.displays,
                quad,
                self.score.rows(quad),
                JAR_BORDER,
                JAR_FILL,
            );
        }
    }

    fn round2_tick(&mut self, now: Instant) {
        if !self.receiver.is_idle() {
            return;
        }
        for quad in 0..QUAD_COUNT {
            let Some(toggle) = self.quads[quad].step(now, &mut self.rng) else {
                continue;
            };
            if self.quads[quad].locked {
                // A locked quadrant keeps its visual; the timers still ran.
                continue;
            }
            match toggle {
                Toggle::Show => {
                    render::draw_face(&mut self.displays, quad, FACE_OUTLINE, FACE_FILL);
                }
                Toggle::Hide => render::blank(&mut self.displays, quad),
                Toggle::Eliminated => self.eliminate(quad),
            }
        }
    }

    /// Terminal visual of the lose sequence: the face with the cross over it.
    fn eliminate(&mut self, quad: usize) {
        render::draw_face(&mut self.displays, quad, FACE_OUTLINE, FACE_FILL);
        // A restore landing after this draw would punch holes in the mark.
        for index in 0..LEDS_PER_QUAD {
            self.flashes.forget(quad, index);
        }
        render::overlay_cross(&mut self.displays, quad, CROSS);
        #[cfg(feature = "defmt")]
        defmt::info!("quadrant {} eliminated", quad);
    }

    fn round3_tick(&mut self, now: Instant) {
        if !self.receiver.is_idle() {
            return;
        }
        self.flashes.try_start(&mut self.displays, &mut self.rng, now);
        self.flashes.restore_expired(&mut self.displays, now);
    }
}

//! NEC infrared receiver: edge timing on a GPIO decoded by a background
//! task, complete frames handed to the control loop through a channel.
//!
//! The control loop never blocks on the remote. [`NecReceiver::poll`] drains
//! the channel; [`NecReceiver::is_idle`] reflects whether the demodulated
//! line has been quiet long enough that a long draw cannot collide with a
//! frame in flight (the protocol's settling margin, kept without sleeping).

use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_rp::Peri;
use embassy_rp::gpio::{AnyPin, Input, Pin, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use portable_atomic::{AtomicBool, Ordering};

use crate::remote::{Receiver, RemoteFrame};
use crate::{Error, Result};

/// Frames decoded but not yet collected by the control loop.
pub type NecNotifier = Channel<CriticalSectionRawMutex, RemoteFrame, 8>;

/// State shared between the decode task and [`NecReceiver`].
pub struct NecShared {
    notifier: NecNotifier,
    idle: AtomicBool,
}

impl NecShared {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            notifier: Channel::new(),
            idle: AtomicBool::new(true),
        }
    }
}

impl Default for NecShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Control-loop handle over the decode task.
///
/// Implements the latching [`Receiver`] contract: after a frame is handed
/// out, further polls return nothing until [`Receiver::resume`].
pub struct NecReceiver {
    shared: &'static NecShared,
    latched: bool,
}

impl NecReceiver {
    /// Start decoding edges on `pin` (active-low receiver module, idles high).
    ///
    /// # Errors
    /// Returns an error if the background task cannot be spawned.
    pub fn new<P: Pin>(
        pin: Peri<'static, P>,
        shared: &'static NecShared,
        spawner: Spawner,
    ) -> Result<Self> {
        let any: Peri<'static, AnyPin> = pin.into();
        spawner
            .spawn(nec_task(Input::new(any, Pull::Up), shared))
            .map_err(Error::TaskSpawn)?;
        Ok(Self { shared, latched: false })
    }
}

impl Receiver for NecReceiver {
    fn poll(&mut self) -> Option<RemoteFrame> {
        if self.latched {
            return None;
        }
        let frame = self.shared.notifier.try_receive().ok()?;
        self.latched = true;
        Some(frame)
    }

    fn is_idle(&self) -> bool {
        self.shared.idle.load(Ordering::Relaxed)
    }

    fn resume(&mut self) {
        self.latched = false;
    }
}

/// The line must stay edge-free this long before drawing is safe again.
const QUIET_WINDOW: Duration = Duration::from_millis(15);

#[embassy_executor::task]
async fn nec_task(mut pin: Input<'static>, shared: &'static NecShared) -> ! {
    let mut decoder = NecDecoder::new();
    let mut level_low = pin.is_low();
    let mut last_edge = Instant::now();

    #[cfg(feature = "defmt")]
    defmt::info!("NEC receiver listening");
    loop {
        match select(pin.wait_for_any_edge(), Timer::after(QUIET_WINDOW)).await {
            Either::First(()) => {
                let now = Instant::now();
                let dt = u32::try_from(now.duration_since(last_edge).as_micros())
                    .unwrap_or(u32::MAX);
                last_edge = now;
                shared.idle.store(false, Ordering::Relaxed);
                // Active-low receiver: every edge toggles the level.
                level_low = !level_low;
                if let Some(frame) = decoder.edge(level_low, dt) {
                    // A full channel means the loop is badly behind; dropping
                    // the frame beats stalling the decode timing.
                    let _ = shared.notifier.try_send(frame);
                }
            }
            Either::Second(()) => {
                decoder.reset();
                shared.idle.store(true, Ordering::Relaxed);
            }
        }
    }
}

// ===== Decoder ==============================================================

#[derive(Copy, Clone, Debug, PartialEq)]
enum DecodeState {
    Idle,
    LeaderLow,
    LeaderHigh,
    BitLow { n: u8, bits: u32 },
    BitHigh { n: u8, bits: u32 },
    RepeatTail,
}

// µs windows
const GLITCH: u32 = 120;
const LEADER_LOW: (u32, u32) = (7_500, 10_500);
const LEADER_HIGH: (u32, u32) = (3_700, 5_300);
const REPEAT_HIGH: (u32, u32) = (1_750, 2_750);
const BIT_LOW: (u32, u32) = (360, 760);
const BIT0_HIGH: (u32, u32) = (310, 810);
const BIT1_HIGH: (u32, u32) = (1_190, 2_190);

fn within(dt: u32, range: (u32, u32)) -> bool {
    dt >= range.0 && dt <= range.1
}

/// Check the complement bytes and split a raw frame into (addr, cmd).
fn validate(bits: u32) -> Option<RemoteFrame> {
    let addr = (bits & 0xFF) as u8;
    let addr_inv = ((bits >> 8) & 0xFF) as u8;
    let cmd = ((bits >> 16) & 0xFF) as u8;
    let cmd_inv = ((bits >> 24) & 0xFF) as u8;
    ((addr ^ addr_inv) == 0xFF && (cmd ^ cmd_inv) == 0xFF)
        .then_some(RemoteFrame::Press { addr, cmd })
}

struct NecDecoder {
    state: DecodeState,
}

impl NecDecoder {
    const fn new() -> Self {
        Self { state: DecodeState::Idle }
    }

    fn reset(&mut self) {
        self.state = DecodeState::Idle;
    }

    /// Feed one edge: `level_low` is the line level after the edge, `dt` the
    /// microseconds since the previous one.
    fn edge(&mut self, level_low: bool, dt: u32) -> Option<RemoteFrame> {
        if dt < GLITCH {
            return None;
        }
        let (state, frame) = match self.state {
            DecodeState::Idle => {
                if level_low {
                    (DecodeState::LeaderLow, None)
                } else {
                    (DecodeState::Idle, None)
                }
            }
            DecodeState::LeaderLow => {
                if !level_low && within(dt, LEADER_LOW) {
                    (DecodeState::LeaderHigh, None)
                } else {
                    (DecodeState::Idle, None)
                }
            }
            DecodeState::LeaderHigh => {
                if level_low && within(dt, LEADER_HIGH) {
                    (DecodeState::BitLow { n: 0, bits: 0 }, None)
                } else if level_low && within(dt, REPEAT_HIGH) {
                    (DecodeState::RepeatTail, None)
                } else {
                    (DecodeState::Idle, None)
                }
            }
            DecodeState::RepeatTail => {
                if !level_low && within(dt, BIT_LOW) {
                    (DecodeState::Idle, Some(RemoteFrame::Repeat))
                } else {
                    (DecodeState::Idle, None)
                }
            }
            DecodeState::BitLow { n, bits } => {
                if !level_low && within(dt, BIT_LOW) {
                    (DecodeState::BitHigh { n, bits }, None)
                } else {
                    (DecodeState::Idle, None)
                }
            }
            DecodeState::BitHigh { n, mut bits } => {
                if level_low && within(dt, BIT1_HIGH) {
                    bits |= 1_u32 << n;
                } else if !(level_low && within(dt, BIT0_HIGH)) {
                    self.state = DecodeState::Idle;
                    return None;
                }
                let n = n + 1;
                if n == 32 {
                    (DecodeState::Idle, validate(bits))
                } else {
                    (DecodeState::BitLow { n, bits }, None)
                }
            }
        };
        self.state = state;
        frame
    }
}

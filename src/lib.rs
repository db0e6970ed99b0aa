//! Control core for a four-quadrant LED game prop: quadrant geometry,
//! drawing primitives, beam-break scoring, remote dispatch, and the
//! mode/animation scheduler. Hardware drivers are feature-gated so the whole
//! core also compiles (and is tested) on the host.
#![no_std]

pub mod anim;
pub mod beams;
pub mod constants;
pub mod display;
pub mod engine;
mod error;
pub mod flashes;
#[cfg(feature = "pico1")]
mod hardware;
pub mod layout;
#[cfg(feature = "pico1")]
mod nec;
mod never;
pub mod remote;
pub mod render;
pub mod rng;
pub mod rounds;
#[cfg(feature = "pico1")]
mod ws2812;

// Re-export commonly used items
pub use anim::{LoseSeq, QuadAnim, Tier, Toggle};
pub use beams::{BeamBank, BeamSensors};
#[cfg(feature = "pico1")]
pub use beams::BeamPins;
pub use display::QuadDisplays;
pub use engine::{Armed, ColumnTag, Engine, Mode};
pub use error::{Error, Result};
pub use flashes::FlashTable;
#[cfg(feature = "pico1")]
pub use hardware::Hardware;
pub use layout::{Layout, QuadLayout};
#[cfg(feature = "pico1")]
pub use nec::{NecReceiver, NecShared};
pub use never::Never;
pub use remote::{Button, ButtonMap, Receiver, RemoteFrame};
pub use rng::Rng;
pub use rounds::RoundScore;
#[cfg(feature = "pico1")]
pub use ws2812::{Ws2812Pins, Ws2812Quads};

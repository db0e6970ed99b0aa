//! Firmware for a four-quadrant LED game prop.
//!
//! Runs on a Raspberry Pi Pico RP2040. One cooperative control loop polls the
//! remote, advances the mode state machine, and drives the per-quadrant
//! animation scheduler; the WS2812 transfers and the NEC decode run as
//! background tasks.
#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use panic_probe as _;
use prop_kit::{
    BeamPins, Engine, Hardware, Never, NecReceiver, NecShared, Result, Ws2812Quads,
};

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Never> {
    let hardware = Hardware::default();

    info!("prop: system start");

    static NEC_SHARED: NecShared = NecShared::new();
    let receiver = NecReceiver::new(hardware.ir, &NEC_SHARED, spawner)?;
    let displays = Ws2812Quads::new(hardware.leds, spawner)?;
    let sensors = BeamPins::new(hardware.beams);

    let seed = Instant::now().as_ticks() as u32;
    let mut engine = Engine::new(displays, sensors, receiver, seed);

    info!("prop: ready");
    loop {
        engine.tick(Instant::now());
        Timer::after(engine.idle_delay()).await;
    }
}

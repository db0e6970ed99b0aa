//! WS2812 output for the four quadrants: one PIO state machine per strip.
//!
//! [`Ws2812Quads`] owns a RAM framebuffer per quadrant and implements
//! [`QuadDisplays`]. A flush scales the buffer by the global brightness and
//! signals the quadrant's writer task; the DMA transfer runs in the
//! background, so a flush never blocks the control loop. Latest-wins: if a
//! new frame lands before the previous one is on the wire, the old one is
//! dropped, which bounds update latency.

use embassy_executor::Spawner;
use embassy_rp::Peri;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{DMA_CH0, DMA_CH1, DMA_CH2, DMA_CH3, PIN_6, PIN_7, PIN_8, PIN_9, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use smart_leds::RGB8;
use static_cell::StaticCell;

use crate::constants::{BRIGHTNESS, LEDS_PER_QUAD, QUAD_COUNT};
use crate::display::QuadDisplays;
use crate::{Error, Result};

bind_interrupts!(pub struct Pio0Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

type QuadFrame = [RGB8; LEDS_PER_QUAD];
type QuadSignal = Signal<CriticalSectionRawMutex, QuadFrame>;

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
const SIGNAL: QuadSignal = Signal::new();
static SIGNALS: [QuadSignal; QUAD_COUNT] = [SIGNAL; QUAD_COUNT];
static PROGRAM: StaticCell<PioWs2812Program<'static, PIO0>> = StaticCell::new();

/// Peripherals consumed by [`Ws2812Quads::new`].
pub struct Ws2812Pins {
    pub pio: Peri<'static, PIO0>,
    pub dma: (
        Peri<'static, DMA_CH0>,
        Peri<'static, DMA_CH1>,
        Peri<'static, DMA_CH2>,
        Peri<'static, DMA_CH3>,
    ),
    pub data: (
        Peri<'static, PIN_6>,
        Peri<'static, PIN_7>,
        Peri<'static, PIN_8>,
        Peri<'static, PIN_9>,
    ),
}

/// The prop's four WS2812 quadrant strips.
pub struct Ws2812Quads {
    frames: [QuadFrame; QUAD_COUNT],
}

impl Ws2812Quads {
    /// Configure the PIO, load the WS2812 program once, and start one writer
    /// task per quadrant.
    ///
    /// # Errors
    /// Returns an error if a writer task cannot be spawned.
    pub fn new(pins: Ws2812Pins, spawner: Spawner) -> Result<Self> {
        let Pio { mut common, sm0, sm1, sm2, sm3, .. } = Pio::new(pins.pio, Pio0Irqs);
        let program = PROGRAM.init(PioWs2812Program::new(&mut common));

        let driver0: PioWs2812<'static, PIO0, 0, LEDS_PER_QUAD> =
            PioWs2812::new(&mut common, sm0, pins.dma.0, pins.data.0, program);
        let driver1: PioWs2812<'static, PIO0, 1, LEDS_PER_QUAD> =
            PioWs2812::new(&mut common, sm1, pins.dma.1, pins.data.1, program);
        let driver2: PioWs2812<'static, PIO0, 2, LEDS_PER_QUAD> =
            PioWs2812::new(&mut common, sm2, pins.dma.2, pins.data.2, program);
        let driver3: PioWs2812<'static, PIO0, 3, LEDS_PER_QUAD> =
            PioWs2812::new(&mut common, sm3, pins.dma.3, pins.data.3, program);

        spawner.spawn(quad0_task(driver0)).map_err(Error::TaskSpawn)?;
        spawner.spawn(quad1_task(driver1)).map_err(Error::TaskSpawn)?;
        spawner.spawn(quad2_task(driver2)).map_err(Error::TaskSpawn)?;
        spawner.spawn(quad3_task(driver3)).map_err(Error::TaskSpawn)?;

        Ok(Self { frames: [[BLACK; LEDS_PER_QUAD]; QUAD_COUNT] })
    }
}

impl QuadDisplays for Ws2812Quads {
    fn quad_count(&self) -> usize {
        QUAD_COUNT
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
            .unwrap_or(BLACK)
    }

    fn clear(&mut self, quad: usize) {
        if let Some(frame) = self.frames.get_mut(quad) {
            *frame = [BLACK; LEDS_PER_QUAD];
        }
    }

    fn flush(&mut self, quad: usize) {
        let Some(frame) = self.frames.get(quad) else {
            return;
        };
        let mut scaled = *frame;
        for pixel in &mut scaled {
            *pixel = dim(*pixel, BRIGHTNESS);
        }
        SIGNALS[quad].signal(scaled);
    }
}

fn dim(color: RGB8, level: u8) -> RGB8 {
    let scale = |value: u8| (((u16::from(value)) * (u16::from(level) + 1)) >> 8) as u8;
    RGB8 { r: scale(color.r), g: scale(color.g), b: scale(color.b) }
}

async fn writer_loop<const SM: usize>(
    mut driver: PioWs2812<'static, PIO0, SM, LEDS_PER_QUAD>,
    signal: &'static QuadSignal,
) -> ! {
    loop {
        let frame = signal.wait().await;
        driver.write(&frame).await;
    }
}

#[embassy_executor::task]
async fn quad0_task(driver: PioWs2812<'static, PIO0, 0, LEDS_PER_QUAD>) -> ! {
    writer_loop(driver, &SIGNALS[0]).await
}

#[embassy_executor::task]
async fn quad1_task(driver: PioWs2812<'static, PIO0, 1, LEDS_PER_QUAD>) -> ! {
    writer_loop(driver, &SIGNALS[1]).await
}

#[embassy_executor::task]
async fn quad2_task(driver: PioWs2812<'static, PIO0, 2, LEDS_PER_QUAD>) -> ! {
    writer_loop(driver, &SIGNALS[2]).await
}

#[embassy_executor::task]
async fn quad3_task(driver: PioWs2812<'static, PIO0, 3, LEDS_PER_QUAD>) -> ! {
    writer_loop(driver, &SIGNALS[3]).await
}

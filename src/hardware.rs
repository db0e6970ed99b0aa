//! Peripheral assignment for the prop's control board.
//!
//! Beam-break sensors on GP2-GP5, WS2812 data on GP6-GP9, remote receiver on
//! GP11; rewire here if the board changes.

use embassy_rp::Peri;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::PIN_11;

use crate::constants::QUAD_COUNT;
use crate::ws2812::Ws2812Pins;

pub struct Hardware {
    pub leds: Ws2812Pins,
    pub beams: [Input<'static>; QUAD_COUNT],
    pub ir: Peri<'static, PIN_11>,
}

impl Default for Hardware {
    fn default() -> Self {
        let peripherals = embassy_rp::init(embassy_rp::config::Config::default());

        let beams = [
            Input::new(peripherals.PIN_2, Pull::Up),
            Input::new(peripherals.PIN_3, Pull::Up),
            Input::new(peripherals.PIN_4, Pull::Up),
            Input::new(peripherals.PIN_5, Pull::Up),
        ];

        Self {
            leds: Ws2812Pins {
                pio: peripherals.PIO0,
                dma: (
                    peripherals.DMA_CH0,
                    peripherals.DMA_CH1,
                    peripherals.DMA_CH2,
                    peripherals.DMA_CH3,
                ),
                data: (
                    peripherals.PIN_6,
                    peripherals.PIN_7,
                    peripherals.PIN_8,
                    peripherals.PIN_9,
                ),
            },
            beams,
            ir: peripherals.PIN_11,
        }
    }
}

//! Beam-break sensing: per-sensor edge memory over raw pull-up inputs.

/// Raw level source for the beam-break sensors.
///
/// The lines are pull-up biased, so a high level means the beam is broken.
/// Out-of-range sensor indices read as low (intact).
pub trait BeamSensors {
    fn is_high(&mut self, index: usize) -> bool;
}

/// Edge detector over `N` sensors.
///
/// Reports each Intact→Broken transition exactly once; holding an object in
/// the beam reports nothing further until the beam clears and breaks again.
pub struct BeamBank<const N: usize> {
    last_broken: [bool; N],
}

impl<const N: usize> BeamBank<N> {
    /// Seeds the edge memory from the current raw levels so a beam already
    /// broken at startup does not score a phantom point.
    pub fn new<S: BeamSensors>(sensors: &mut S) -> Self {
        let mut bank = Self { last_broken: [false; N] };
        bank.resync(sensors);
        bank
    }

    /// True exactly once per Intact→Broken transition of sensor `index`.
    pub fn broke<S: BeamSensors>(&mut self, sensors: &mut S, index: usize) -> bool {
        let Some(last) = self.last_broken.get_mut(index) else {
            return false;
        };
        let broken_now = sensors.is_high(index);
        let edge = broken_now && !*last;
        *last = broken_now;
        #[cfg(feature = "defmt")]
        if edge {
            defmt::info!("beam {} broken", index);
        }
        edge
    }

    /// Reload the edge memory from the raw lines without reporting events.
    ///
    /// Required when entering a scoring mode: a beam left broken in the
    /// previous round must not fire a point in the new one.
    pub fn resync<S: BeamSensors>(&mut self, sensors: &mut S) {
        for (index, last) in self.last_broken.iter_mut().enumerate() {
            *last = sensors.is_high(index);
        }
    }
}

#[cfg(feature = "pico1")]
mod pins {
    use embassy_rp::gpio::Input;

    use super::BeamSensors;
    use crate::constants::QUAD_COUNT;

    /// The prop's four beam-break inputs.
    pub struct BeamPins([Input<'static>; QUAD_COUNT]);

    impl BeamPins {
        #[must_use]
        pub fn new(inputs: [Input<'static>; QUAD_COUNT]) -> Self {
            Self(inputs)
        }
    }

    impl BeamSensors for BeamPins {
        fn is_high(&mut self, index: usize) -> bool {
            self.0.get(index).is_some_and(Input::is_high)
        }
    }
}

#[cfg(feature = "pico1")]
pub use pins::BeamPins;

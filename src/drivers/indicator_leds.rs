//! Green/red indicator LEDs on two push-pull GPIOs (active HIGH).

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::IndicatorPort;

pub struct IndicatorLeds<G, R> {
    green: G,
    red: R,
}

impl<G: OutputPin, R: OutputPin> IndicatorLeds<G, R> {
    /// Both LEDs start dark.
    pub fn new(green: G, red: R) -> Self {
        let mut leds = Self { green, red };
        leds.set_success(false);
        leds.set_error(false);
        leds
    }
}

impl<G: OutputPin, R: OutputPin> IndicatorPort for IndicatorLeds<G, R> {
    fn set_success(&mut self, on: bool) {
        if let Err(e) = self.green.set_state(PinState::from(on)) {
            warn!("indicator: green write failed: {:?}", e);
        }
    }

    fn set_error(&mut self, on: bool) {
        if let Err(e) = self.red.set_state(PinState::from(on)) {
            warn!("indicator: red write failed: {:?}", e);
        }
    }
}

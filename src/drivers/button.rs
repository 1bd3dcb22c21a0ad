//! Session start button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with a pull-up: pressed reads LOW.  The
//! level is sampled once per control tick; edge detection happens in the
//! core ([`EdgeDetector`](crate::edge::EdgeDetector)), and there is no
//! extra debounce beyond the poll rate.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::SessionInputPort;

pub struct StartButton<P> {
    pin: P,
    /// Last good level; reused when a read fails.
    last_pressed: bool,
}

impl<P: InputPin> StartButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_pressed: false,
        }
    }

    pub fn is_pressed(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => {
                self.last_pressed = low;
                low
            }
            Err(e) => {
                warn!("button: read failed: {:?}", e);
                self.last_pressed
            }
        }
    }
}

impl<P: InputPin> SessionInputPort for StartButton<P> {
    fn start_pressed(&mut self) -> bool {
        self.is_pressed()
    }
}

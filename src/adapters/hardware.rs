//! Hardware adapter: bridges the board's peripherals to the port traits.
//!
//! Owns one driver per port and forwards each call, so the terminal sees
//! a single [`TerminalHardware`](crate::app::ports::TerminalHardware)
//! value.  The drivers are type parameters: the firmware plugs in the
//! `drivers` module on ESP-IDF pins, tests plug in mocks.

use crate::app::ports::{
    IndicatorPort, NumericDisplayPort, ReaderPort, SessionInputPort, TextDisplayPort,
};
use crate::registry::CardUid;

/// Concrete adapter that combines all hardware behind the port traits.
pub struct HardwareAdapter<R, T, N, I, B> {
    reader: R,
    text: T,
    numeric: N,
    indicator: I,
    button: B,
}

impl<R, T, N, I, B> HardwareAdapter<R, T, N, I, B> {
    pub fn new(reader: R, text: T, numeric: N, indicator: I, button: B) -> Self {
        Self {
            reader,
            text,
            numeric,
            indicator,
            button,
        }
    }
}

// ── ReaderPort ────────────────────────────────────────────────

impl<R: ReaderPort, T, N, I, B> ReaderPort for HardwareAdapter<R, T, N, I, B> {
    fn card_present(&mut self) -> bool {
        self.reader.card_present()
    }

    fn read_identifier(&mut self) -> Option<CardUid> {
        self.reader.read_identifier()
    }
}

// ── Display ports ─────────────────────────────────────────────

impl<R, T: TextDisplayPort, N, I, B> TextDisplayPort for HardwareAdapter<R, T, N, I, B> {
    fn clear(&mut self) {
        self.text.clear();
    }

    fn write_line(&mut self, row: u8, text: &str) {
        self.text.write_line(row, text);
    }
}

impl<R, T, N: NumericDisplayPort, I, B> NumericDisplayPort for HardwareAdapter<R, T, N, I, B> {
    fn show_value(&mut self, value: u16) {
        self.numeric.show_value(value);
    }

    fn show_placeholder(&mut self) {
        self.numeric.show_placeholder();
    }
}

// ── Indicator and button ──────────────────────────────────────

impl<R, T, N, I: IndicatorPort, B> IndicatorPort for HardwareAdapter<R, T, N, I, B> {
    fn set_success(&mut self, on: bool) {
        self.indicator.set_success(on);
    }

    fn set_error(&mut self, on: bool) {
        self.indicator.set_error(on);
    }
}

impl<R, T, N, I, B: SessionInputPort> SessionInputPort for HardwareAdapter<R, T, N, I, B> {
    fn start_pressed(&mut self) -> bool {
        self.button.start_pressed()
    }
}

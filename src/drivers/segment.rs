//! TM1637 four-digit seven-segment driver (bit-banged two-wire bus).
//!
//! ## Protocol
//!
//! ```text
//!  start: DIO ↓ while CLK high
//!  byte : 8 bits LSB first, DIO changes while CLK low, latched on CLK ↑
//!  ack  : one extra clock (the chip pulls DIO low; not read back)
//!  stop : DIO ↑ while CLK high
//! ```
//!
//! A frame is: data command (auto-increment), address command + four
//! segment bytes, display-control command (on + brightness).
//! Bit 7 of the second digit drives the centre colon.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::NumericDisplayPort;
use crate::error::DisplayError;

const CMD_DATA_AUTO_INCREMENT: u8 = 0x40;
const CMD_ADDRESS_DIGIT0: u8 = 0xC0;
const CMD_DISPLAY_ON: u8 = 0x88;

/// Half-period of the bit clock.
const BIT_DELAY_US: u32 = 5;

/// Segment patterns for 0–9 (bit 0 = segment a … bit 6 = segment g).
const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];
const COLON: u8 = 0x80;
const DASH: u8 = 0x40;

/// `----`, shown while no session runs.
pub const PLACEHOLDER: [u8; 4] = [DASH; 4];

/// Segment bytes for a four-digit value with the colon lit.
/// Values above 9999 show their last four digits.
pub fn encode_readout(value: u16) -> [u8; 4] {
    let v = usize::from(value % 10_000);
    [
        DIGITS[v / 1000],
        DIGITS[(v / 100) % 10] | COLON,
        DIGITS[(v / 10) % 10],
        DIGITS[v % 10],
    ]
}

pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    /// 0–7.
    brightness: u8,
    /// Last frame written successfully; identical frames are skipped.
    shown: Option<[u8; 4]>,
}

impl<CLK: OutputPin, DIO: OutputPin, D: DelayNs> Tm1637<CLK, DIO, D> {
    pub fn new(clk: CLK, dio: DIO, delay: D, brightness: u8) -> Self {
        Self {
            clk,
            dio,
            delay,
            brightness: brightness.min(7),
            shown: None,
        }
    }

    pub fn write_segments(&mut self, segments: [u8; 4]) -> Result<(), DisplayError> {
        if self.shown == Some(segments) {
            return Ok(());
        }
        self.shown = None;

        self.start()?;
        self.write_byte(CMD_DATA_AUTO_INCREMENT)?;
        self.stop()?;

        self.start()?;
        self.write_byte(CMD_ADDRESS_DIGIT0)?;
        for seg in segments {
            self.write_byte(seg)?;
        }
        self.stop()?;

        self.start()?;
        self.write_byte(CMD_DISPLAY_ON | self.brightness)?;
        self.stop()?;

        self.shown = Some(segments);
        Ok(())
    }

    // ── Bus primitives ────────────────────────────────────────

    fn clk(&mut self, high: bool) -> Result<(), DisplayError> {
        let r = if high { self.clk.set_high() } else { self.clk.set_low() };
        r.map_err(|_| DisplayError::Pin)?;
        self.delay.delay_us(BIT_DELAY_US);
        Ok(())
    }

    fn dio(&mut self, high: bool) -> Result<(), DisplayError> {
        let r = if high { self.dio.set_high() } else { self.dio.set_low() };
        r.map_err(|_| DisplayError::Pin)?;
        self.delay.delay_us(BIT_DELAY_US);
        Ok(())
    }

    fn start(&mut self) -> Result<(), DisplayError> {
        self.clk(true)?;
        self.dio(true)?;
        self.dio(false)
    }

    fn stop(&mut self) -> Result<(), DisplayError> {
        self.clk(false)?;
        self.dio(false)?;
        self.clk(true)?;
        self.dio(true)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        for bit in 0..8 {
            self.clk(false)?;
            self.dio(byte & (1 << bit) != 0)?;
            self.clk(true)?;
        }
        // ACK slot.
        self.clk(false)?;
        self.dio(true)?;
        self.clk(true)?;
        self.clk(false)
    }
}

impl<CLK: OutputPin, DIO: OutputPin, D: DelayNs> NumericDisplayPort for Tm1637<CLK, DIO, D> {
    fn show_value(&mut self, value: u16) {
        if let Err(e) = self.write_segments(encode_readout(value)) {
            warn!("segment: write failed: {}", e);
        }
    }

    fn show_placeholder(&mut self) {
        if let Err(e) = self.write_segments(PLACEHOLDER) {
            warn!("segment: write failed: {}", e);
        }
    }
}

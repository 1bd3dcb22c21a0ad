//! HD44780 16×2 character display behind a PCF8574 I²C backpack.
//!
//! ## Backpack wiring
//!
//! | PCF8574 bit | LCD pin   |
//! |-------------|-----------|
//! | P0          | RS        |
//! | P1          | RW (tied low: write only) |
//! | P2          | EN        |
//! | P3          | backlight |
//! | P4–P7       | D4–D7     |
//!
//! The controller runs in 4-bit mode: every byte goes out as two nibbles,
//! each latched by an EN pulse, so one byte costs four I²C writes.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::TextDisplayPort;
use crate::error::DisplayError;

/// Common backpack address (A0–A2 pulled high).
pub const DEFAULT_ADDRESS: u8 = 0x27;
pub const COLUMNS: usize = 16;
pub const ROWS: u8 = 2;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_LEFT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct Hd44780<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Hd44780<I, D> {
    /// Does not touch the bus; call [`init`](Self::init) next.
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self { i2c, delay, address }
    }

    /// Power-on reset into 4-bit, two-line mode; display on, cleared.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        // Three 8-bit function sets force a known state, then switch to 4-bit.
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear_screen()?;
        self.command(CMD_ENTRY_LEFT)?;
        info!("lcd: ready at 0x{:02X}", self.address);
        Ok(())
    }

    pub fn clear_screen(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Write `text` to `row`, padded or cut to the panel width.
    /// Characters outside printable ASCII show as `?`.
    pub fn print_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let offset = ROW_OFFSETS[usize::from(row.min(ROWS - 1))];
        self.command(CMD_SET_DDRAM | offset)?;

        let mut chars = text.chars();
        for _ in 0..COLUMNS {
            let c = match chars.next() {
                Some(c) if c == ' ' || c.is_ascii_graphic() => c as u8,
                Some(_) => b'?',
                None => b' ',
            };
            self.data(c)?;
        }
        Ok(())
    }

    // ── Bus primitives ────────────────────────────────────────

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send(byte, 0)
    }

    fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send(byte, RS)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte & 0xF0, mode)?;
        self.write_nibble((byte << 4) & 0xF0, mode)
    }

    /// `nibble` is already in the upper four bits.
    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), DisplayError> {
        let bits = nibble | BACKLIGHT | mode;
        self.expander_write(bits | EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[bits])
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I: I2c, D: DelayNs> TextDisplayPort for Hd44780<I, D> {
    fn clear(&mut self) {
        if let Err(e) = self.clear_screen() {
            warn!("lcd: clear failed: {}", e);
        }
    }

    fn write_line(&mut self, row: u8, text: &str) {
        if let Err(e) = self.print_line(row, text) {
            warn!("lcd: write failed: {}", e);
        }
    }
}

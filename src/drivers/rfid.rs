//! MFRC522 13.56 MHz card reader over SPI.
//!
//! Only what the terminal needs: wake a card with REQA, run cascade-level-1
//! anticollision to get the 4-byte UID, verify its BCC.  No SELECT, no
//! authentication, no block reads.
//!
//! ## SPI framing
//!
//! ```text
//!  address byte: [R/W̄][ reg(6) ][0]
//!  read : 0x80 | (reg << 1), dummy  → second byte is the value
//!  write:        (reg << 1), value
//! ```

use core::fmt::Write as _;

use embedded_hal::spi::SpiDevice;
use log::{debug, info, warn};

use crate::app::ports::ReaderPort;
use crate::error::ReaderError;
use crate::registry::CardUid;

// ── Registers ─────────────────────────────────────────────────
const REG_COMMAND: u8 = 0x01;
const REG_COM_IRQ: u8 = 0x04;
const REG_ERROR: u8 = 0x06;
const REG_FIFO_DATA: u8 = 0x09;
const REG_FIFO_LEVEL: u8 = 0x0A;
const REG_BIT_FRAMING: u8 = 0x0D;
const REG_COLL: u8 = 0x0E;
const REG_MODE: u8 = 0x11;
const REG_TX_CONTROL: u8 = 0x14;
const REG_TX_ASK: u8 = 0x15;
const REG_T_MODE: u8 = 0x2A;
const REG_T_PRESCALER: u8 = 0x2B;
const REG_T_RELOAD_H: u8 = 0x2C;
const REG_T_RELOAD_L: u8 = 0x2D;
const REG_VERSION: u8 = 0x37;

// ── Chip commands ─────────────────────────────────────────────
const CMD_IDLE: u8 = 0x00;
const CMD_TRANSCEIVE: u8 = 0x0C;
const CMD_SOFT_RESET: u8 = 0x0F;

// ── PICC commands ─────────────────────────────────────────────
const PICC_REQA: u8 = 0x26;
const PICC_ANTICOLL_CL1: [u8; 2] = [0x93, 0x20];

const IRQ_TIMER: u8 = 0x01;
const IRQ_RX_OR_IDLE: u8 = 0x30;
const ERR_COLLISION: u8 = 0x08;
const ERR_FATAL: u8 = 0x13;
const BIT_FRAMING_START_SEND: u8 = 0x80;
/// REQA is a 7-bit short frame.
const SHORT_FRAME_BITS: u8 = 0x07;

/// Upper bound on IRQ register polls per transceive.  The chip timer
/// (25 ms) normally fires long before this.
const MAX_IRQ_POLLS: u16 = 2_000;

/// SPI address byte for `reg`.
pub const fn address_byte(reg: u8, read: bool) -> u8 {
    let addr = (reg << 1) & 0x7E;
    if read { addr | 0x80 } else { addr }
}

/// Block check character: XOR of the four UID bytes must equal the fifth.
pub fn bcc_ok(frame: &[u8; 5]) -> bool {
    frame[0] ^ frame[1] ^ frame[2] ^ frame[3] == frame[4]
}

/// Upper-case, space-separated hex (`04 AB CD EF`).
pub fn uid_to_hex(uid: &[u8]) -> CardUid {
    let mut out = CardUid::new();
    for (i, b) in uid.iter().enumerate() {
        let sep = if i == 0 { "" } else { " " };
        // A 10-byte UID needs 29 chars; capacity is 32.
        if write!(out, "{sep}{b:02X}").is_err() {
            break;
        }
    }
    out
}

pub struct Mfrc522<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Mfrc522<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Soft reset, timer and modulation setup, antenna on.
    /// Returns the chip version byte.
    pub fn init(&mut self) -> Result<u8, ReaderError> {
        self.write_reg(REG_COMMAND, CMD_SOFT_RESET)?;

        // Timer: auto-start, 40 kHz tick, 1000 ticks = 25 ms timeout.
        self.write_reg(REG_T_MODE, 0x80)?;
        self.write_reg(REG_T_PRESCALER, 0xA9)?;
        self.write_reg(REG_T_RELOAD_H, 0x03)?;
        self.write_reg(REG_T_RELOAD_L, 0xE8)?;
        // 100 % ASK, CRC preset 0x6363.
        self.write_reg(REG_TX_ASK, 0x40)?;
        self.write_reg(REG_MODE, 0x3D)?;

        let tx = self.read_reg(REG_TX_CONTROL)?;
        if tx & 0x03 != 0x03 {
            self.write_reg(REG_TX_CONTROL, tx | 0x03)?;
        }

        let version = self.read_reg(REG_VERSION)?;
        if version == 0x00 || version == 0xFF {
            return Err(ReaderError::NotDetected);
        }
        info!("rfid: MFRC522 version 0x{:02X}", version);
        Ok(version)
    }

    /// REQA: `true` if a card answered with a two-byte ATQA.
    pub fn request_a(&mut self) -> Result<bool, ReaderError> {
        let mut atqa = [0u8; 2];
        let n = self.transceive(&[PICC_REQA], SHORT_FRAME_BITS, &mut atqa)?;
        Ok(n == atqa.len())
    }

    /// Cascade-level-1 anticollision: the 4-byte UID, BCC-checked.
    pub fn anticollision(&mut self) -> Result<[u8; 4], ReaderError> {
        // Keep received bits after a collision.
        self.clear_bits(REG_COLL, 0x80)?;
        let mut frame = [0u8; 5];
        let n = self.transceive(&PICC_ANTICOLL_CL1, 0x00, &mut frame)?;
        if n != frame.len() {
            return Err(ReaderError::ShortFrame);
        }
        if !bcc_ok(&frame) {
            return Err(ReaderError::BadChecksum);
        }
        Ok([frame[0], frame[1], frame[2], frame[3]])
    }

    // ── Transceive ────────────────────────────────────────────

    fn transceive(
        &mut self,
        send: &[u8],
        bit_framing: u8,
        recv: &mut [u8],
    ) -> Result<usize, ReaderError> {
        self.write_reg(REG_COMMAND, CMD_IDLE)?;
        self.write_reg(REG_COM_IRQ, 0x7F)?;
        self.write_reg(REG_FIFO_LEVEL, 0x80)?;
        for b in send {
            self.write_reg(REG_FIFO_DATA, *b)?;
        }
        self.write_reg(REG_BIT_FRAMING, bit_framing)?;
        self.write_reg(REG_COMMAND, CMD_TRANSCEIVE)?;
        self.set_bits(REG_BIT_FRAMING, BIT_FRAMING_START_SEND)?;

        let result = self.wait_for_rx();
        self.clear_bits(REG_BIT_FRAMING, BIT_FRAMING_START_SEND)?;
        result?;

        let err = self.read_reg(REG_ERROR)?;
        if err & ERR_FATAL != 0 {
            return Err(ReaderError::Protocol);
        }
        if err & ERR_COLLISION != 0 {
            return Err(ReaderError::Collision);
        }

        let level = usize::from(self.read_reg(REG_FIFO_LEVEL)?);
        let n = level.min(recv.len());
        for slot in recv.iter_mut().take(n) {
            *slot = self.read_reg(REG_FIFO_DATA)?;
        }
        Ok(level)
    }

    fn wait_for_rx(&mut self) -> Result<(), ReaderError> {
        for _ in 0..MAX_IRQ_POLLS {
            let irq = self.read_reg(REG_COM_IRQ)?;
            if irq & IRQ_RX_OR_IDLE != 0 {
                return Ok(());
            }
            if irq & IRQ_TIMER != 0 {
                return Err(ReaderError::Timeout);
            }
        }
        Err(ReaderError::Timeout)
    }

    // ── Register access ───────────────────────────────────────

    fn read_reg(&mut self, reg: u8) -> Result<u8, ReaderError> {
        let mut buf = [address_byte(reg, true), 0];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|_| ReaderError::Spi)?;
        Ok(buf[1])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), ReaderError> {
        self.spi
            .write(&[address_byte(reg, false), value])
            .map_err(|_| ReaderError::Spi)
    }

    fn set_bits(&mut self, reg: u8, mask: u8) -> Result<(), ReaderError> {
        let v = self.read_reg(reg)?;
        self.write_reg(reg, v | mask)
    }

    fn clear_bits(&mut self, reg: u8, mask: u8) -> Result<(), ReaderError> {
        let v = self.read_reg(reg)?;
        self.write_reg(reg, v & !mask)
    }
}

impl<SPI: SpiDevice> ReaderPort for Mfrc522<SPI> {
    fn card_present(&mut self) -> bool {
        match self.request_a() {
            Ok(present) => present,
            // No card in the field: the chip timer runs out.
            Err(ReaderError::Timeout) => false,
            Err(e) => {
                debug!("rfid: REQA failed: {}", e);
                false
            }
        }
    }

    fn read_identifier(&mut self) -> Option<CardUid> {
        match self.anticollision() {
            Ok(uid) => Some(uid_to_hex(&uid)),
            Err(e) => {
                warn!("rfid: UID read failed: {}", e);
                None
            }
        }
    }
}

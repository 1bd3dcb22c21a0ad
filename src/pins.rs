//! GPIO / peripheral pin assignments for the terminal board (ESP32 DevKit).
//!
//! Single source of truth: the firmware entry point builds every driver
//! from these numbers.

// ---------------------------------------------------------------------------
// MFRC522 card reader (SPI2 / HSPI)
// ---------------------------------------------------------------------------

pub const RFID_SCK_GPIO: i32 = 18;
pub const RFID_MOSI_GPIO: i32 = 23;
pub const RFID_MISO_GPIO: i32 = 19;
/// Chip select (the module's SDA pin).
pub const RFID_CS_GPIO: i32 = 5;
/// Reader SPI clock.
pub const RFID_SPI_HZ: u32 = 4_000_000;

// ---------------------------------------------------------------------------
// I²C bus: HD44780 via PCF8574 backpack
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
pub const I2C_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// TM1637 countdown readout (bit-banged)
// ---------------------------------------------------------------------------

pub const SEGMENT_CLK_GPIO: i32 = 32;
pub const SEGMENT_DIO_GPIO: i32 = 33;
/// 0–7.
pub const SEGMENT_BRIGHTNESS: u8 = 4;

// ---------------------------------------------------------------------------
// Indicators and start button
// ---------------------------------------------------------------------------

/// Green LED, active HIGH.
pub const LED_SUCCESS_GPIO: i32 = 25;
/// Red LED, active HIGH.
pub const LED_ERROR_GPIO: i32 = 26;
/// Momentary push-button, active LOW with internal pull-up.
pub const BUTTON_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Event feed UART (UART1)
// ---------------------------------------------------------------------------

pub const FEED_TX_GPIO: i32 = 17;
pub const FEED_RX_GPIO: i32 = 16;

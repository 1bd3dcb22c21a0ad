//! Rollcall firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            SerialEventSink  NvsAdapter        │
//! │  (Mfrc522 · Hd44780 ·       (EventSink)      (Config+Roster)   │
//! │   Tm1637 · LEDs · button)                    MonotonicClock    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Terminal (pure logic)                     │    │
//! │  │  Scheduler · Session FSM · Presence · PollGate         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::config::Config as SpiConfig;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriverConfig};
use esp_idf_hal::uart::{self, UartDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use rollcall::adapters::hardware::HardwareAdapter;
use rollcall::adapters::nvs::NvsAdapter;
use rollcall::adapters::serial_sink::SerialEventSink;
use rollcall::adapters::time::MonotonicClock;
use rollcall::app::ports::{ClockPort, ConfigPort, RosterPort};
use rollcall::app::service::Terminal;
use rollcall::config::TerminalConfig;
use rollcall::drivers::button::StartButton;
use rollcall::drivers::indicator_leds::IndicatorLeds;
use rollcall::drivers::lcd::{self, Hd44780};
use rollcall::drivers::rfid::Mfrc522;
use rollcall::drivers::segment::Tm1637;
use rollcall::pins;
use rollcall::registry::Registry;

// ── Feed UART as std::io::Write ───────────────────────────────

struct FeedUart<'d>(UartDriver<'d>);

impl std::io::Write for FeedUart<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf).map_err(std::io::Error::other)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Rollcall v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config + roster from NVS (or defaults) ─────────────
    let nvs = NvsAdapter::new(EspDefaultNvsPartition::take()?)
        .map_err(|e| anyhow::anyhow!("NVS: {e}"))?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            TerminalConfig::default()
        }
    };
    let registry = match nvs.load_roster() {
        Ok(r) => r,
        Err(e) => {
            warn!("Roster load failed ({}), every card will be rejected", e);
            Registry::empty()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    // SAFETY: each GPIO number in `pins` is claimed exactly once, here,
    // and `peripherals.pins` is never used.
    let pin_io = |n: i32| unsafe { AnyIOPin::new(n) };
    let pin_out = |n: i32| unsafe { AnyOutputPin::new(n) };
    let pin_in = |n: i32| unsafe { AnyInputPin::new(n) };

    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        pin_out(pins::RFID_SCK_GPIO),
        pin_out(pins::RFID_MOSI_GPIO),
        Some(pin_in(pins::RFID_MISO_GPIO)),
        Some(pin_out(pins::RFID_CS_GPIO)),
        &SpiDriverConfig::new(),
        &SpiConfig::new().baudrate(Hertz(pins::RFID_SPI_HZ)),
    )
    .context("SPI init")?;
    let mut reader = Mfrc522::new(spi);
    if let Err(e) = reader.init() {
        // Nothing works without the reader: halt before the loop starts.
        error!("Card reader init failed: {}, halting", e);
        loop {
            FreeRtos::delay_ms(1_000);
        }
    }

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        pin_io(pins::I2C_SDA_GPIO),
        pin_io(pins::I2C_SCL_GPIO),
        &I2cConfig::new().baudrate(Hertz(pins::I2C_HZ)),
    )
    .context("I2C init")?;
    let mut text = Hd44780::new(i2c, Ets, lcd::DEFAULT_ADDRESS);
    if let Err(e) = text.init() {
        warn!("LCD init failed ({}), continuing without text display", e);
    }

    let numeric = Tm1637::new(
        PinDriver::output(pin_out(pins::SEGMENT_CLK_GPIO))?,
        PinDriver::output(pin_out(pins::SEGMENT_DIO_GPIO))?,
        Ets,
        pins::SEGMENT_BRIGHTNESS,
    );
    let indicator = IndicatorLeds::new(
        PinDriver::output(pin_out(pins::LED_SUCCESS_GPIO))?,
        PinDriver::output(pin_out(pins::LED_ERROR_GPIO))?,
    );
    let mut button_pin = PinDriver::input(pin_io(pins::BUTTON_GPIO))?;
    button_pin.set_pull(Pull::Up)?;
    let button = StartButton::new(button_pin);

    let uart = UartDriver::new(
        peripherals.uart1,
        pin_out(pins::FEED_TX_GPIO),
        pin_in(pins::FEED_RX_GPIO),
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart::config::Config::default().baudrate(Hertz(config.serial_baud)),
    )
    .context("UART init")?;
    let sink = SerialEventSink::new(FeedUart(uart));

    // ── 4. Terminal ───────────────────────────────────────────
    let hw = HardwareAdapter::new(reader, text, numeric, indicator, button);
    let clock = MonotonicClock::new();
    let mut terminal = Terminal::new(&config, registry, hw, sink, clock.now_ms())?;
    terminal.start();

    // ── 5. Control loop ───────────────────────────────────────
    info!("Entering control loop ({}ms period)", config.loop_interval_ms);
    loop {
        terminal.tick(clock.now_ms());
        // Yield so the idle task can feed the task watchdog.
        FreeRtos::delay_ms(config.loop_interval_ms.max(1));
    }
}

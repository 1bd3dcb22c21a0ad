//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                  | Connects to               |
//! |---------------|-----------------------------|---------------------------|
//! | `hardware`    | ReaderPort, TextDisplayPort | the `drivers` on the board |
//! |               | NumericDisplayPort          |                           |
//! |               | IndicatorPort               |                           |
//! |               | SessionInputPort            |                           |
//! | `serial_sink` | EventSink                   | UART event feed + log     |
//! | `nvs`         | ConfigPort, RosterPort      | NVS / in-memory store     |
//! | `time`        | ClockPort                   | ESP32 system timer        |

pub mod hardware;
pub mod nvs;
pub mod serial_sink;
pub mod time;

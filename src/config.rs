//! Terminal configuration parameters.
//!
//! All tunable timings for the attendance terminal.  Values can be
//! overridden through NVS; see [`NvsAdapter`](crate::adapters::nvs::NvsAdapter).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Longest session the MM:SS readout can show (99:59).
pub const MAX_SESSION_SECS: u32 = 99 * 60 + 59;

/// Core terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    // --- Session ---
    /// Full countdown length (seconds).
    pub session_length_secs: u32,

    // --- Reader ---
    /// Minimum spacing between reader polls (milliseconds).
    pub reader_poll_interval_ms: u32,
    /// Dead time after any read (milliseconds).
    pub reader_cooldown_ms: u32,

    // --- Outputs ---
    /// How long an indicator stays lit (milliseconds).
    pub indicator_blink_ms: u32,
    /// Numeric readout refresh interval (milliseconds).
    pub render_interval_ms: u32,

    // --- Loop ---
    /// Sleep between control-loop iterations (milliseconds).
    pub loop_interval_ms: u32,
    /// Event feed UART baud rate.
    pub serial_baud: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            session_length_secs: 45 * 60,

            reader_poll_interval_ms: 100,
            reader_cooldown_ms: 2_000,

            indicator_blink_ms: 1_000,
            render_interval_ms: 250,

            loop_interval_ms: 5,
            serial_baud: 9_600,
        }
    }
}

impl TerminalConfig {
    /// Range-check every field.  Never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, msg: &'static str) -> Result<(), ConfigError> {
            if ok { Ok(()) } else { Err(ConfigError::ValidationFailed(msg)) }
        }

        check(
            (1..=MAX_SESSION_SECS).contains(&self.session_length_secs),
            "session_length_secs must be 1..=5999",
        )?;
        check(
            (10..=5_000).contains(&self.reader_poll_interval_ms),
            "reader_poll_interval_ms must be 10..=5000",
        )?;
        check(
            self.reader_cooldown_ms >= self.reader_poll_interval_ms
                && self.reader_cooldown_ms <= 60_000,
            "reader_cooldown_ms must be >= poll interval and <= 60000",
        )?;
        check(
            (50..=10_000).contains(&self.indicator_blink_ms),
            "indicator_blink_ms must be 50..=10000",
        )?;
        check(
            (10..=5_000).contains(&self.render_interval_ms),
            "render_interval_ms must be 10..=5000",
        )?;
        check(self.loop_interval_ms <= 100, "loop_interval_ms must be <= 100")?;
        check(self.serial_baud > 0, "serial_baud must be > 0")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = TerminalConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.session_length_secs, 2_700);
        assert_eq!(c.serial_baud, 9_600);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = TerminalConfig::default();
        assert!(
            c.reader_poll_interval_ms < c.reader_cooldown_ms,
            "a card should be polled several times per cooldown"
        );
        assert!(c.loop_interval_ms < c.reader_poll_interval_ms);
    }

    #[test]
    fn rejects_out_of_range() {
        let bad = [
            TerminalConfig { session_length_secs: 0, ..Default::default() },
            TerminalConfig { session_length_secs: MAX_SESSION_SECS + 1, ..Default::default() },
            TerminalConfig { reader_poll_interval_ms: 5, ..Default::default() },
            TerminalConfig { reader_cooldown_ms: 50, ..Default::default() },
            TerminalConfig { indicator_blink_ms: 0, ..Default::default() },
            TerminalConfig { render_interval_ms: 0, ..Default::default() },
            TerminalConfig { loop_interval_ms: 500, ..Default::default() },
            TerminalConfig { serial_baud: 0, ..Default::default() },
        ];
        for c in bad {
            assert!(
                matches!(c.validate(), Err(ConfigError::ValidationFailed(_))),
                "accepted {c:?}"
            );
        }
    }

    #[test]
    fn serde_roundtrip() {
        let c = TerminalConfig { session_length_secs: 600, ..Default::default() };
        let json = serde_json::to_string(&c).unwrap();
        let c2: TerminalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = TerminalConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: TerminalConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c, c2);
    }
}

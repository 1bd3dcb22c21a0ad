//! Success/error indicator with automatic switch-off.
//!
//! A scan outcome lights one indicator and stamps a single shared
//! timestamp.  Once the blink duration has elapsed, the lit indicator is
//! switched off.  Lighting the other colour before that switches the first
//! one off and restarts the shared timer, so at most one line is ever
//! asserted.

use log::debug;

use crate::app::ports::IndicatorPort;
use crate::timing::OneShotTimer;

/// Which indicator line to assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Green: authorized scan (login or logout alike).
    Success,
    /// Red: unknown card or failed read.
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct IndicatorTimer {
    success_lit: bool,
    error_lit: bool,
    timer: OneShotTimer,
}

impl IndicatorTimer {
    pub const fn new(blink_ms: u32) -> Self {
        Self {
            success_lit: false,
            error_lit: false,
            timer: OneShotTimer::new(blink_ms),
        }
    }

    /// Light `which`, drop the other line, and (re)start the shared
    /// auto-off timer.
    pub fn flash(&mut self, which: Indicator, now_ms: u32, port: &mut impl IndicatorPort) {
        match which {
            Indicator::Success => {
                if self.error_lit {
                    port.set_error(false);
                    self.error_lit = false;
                }
                port.set_success(true);
                self.success_lit = true;
            }
            Indicator::Error => {
                if self.success_lit {
                    port.set_success(false);
                    self.success_lit = false;
                }
                port.set_error(true);
                self.error_lit = true;
            }
        }
        self.timer.arm(now_ms);
    }

    /// Switch everything off once the blink duration has elapsed.
    /// Returns `true` on the iteration the indicators go dark.
    pub fn expire(&mut self, now_ms: u32, port: &mut impl IndicatorPort) -> bool {
        if !self.timer.poll(now_ms) {
            return false;
        }
        if self.success_lit {
            port.set_success(false);
            self.success_lit = false;
        }
        if self.error_lit {
            port.set_error(false);
            self.error_lit = false;
        }
        debug!("indicator: auto-off at {}ms", now_ms);
        true
    }

    pub fn is_lit(&self, which: Indicator) -> bool {
        match which {
            Indicator::Success => self.success_lit,
            Indicator::Error => self.error_lit,
        }
    }
}

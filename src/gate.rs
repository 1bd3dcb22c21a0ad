//! Reader poll gate.
//!
//! Two timers throttle how often the card reader is interrogated:
//!
//! - the **poll interval** bounds the cost of asking the reader whether a
//!   card is in the field;
//! - the **cooldown** starts after every read, whatever its outcome, so a
//!   card left lying on the reader does not produce a burst of scans.
//!
//! The gate only reports; the caller performs the read and tells the gate
//! what happened.

use crate::timing::{IntervalTimer, OneShotTimer};

#[derive(Debug, Clone, Copy)]
pub struct PollGate {
    poll: IntervalTimer,
    cooldown: OneShotTimer,
}

impl PollGate {
    pub fn new(poll_interval_ms: u32, cooldown_ms: u32, now_ms: u32) -> Self {
        Self {
            poll: IntervalTimer::new(poll_interval_ms, now_ms),
            cooldown: OneShotTimer::new(cooldown_ms),
        }
    }

    /// True only when the poll interval has elapsed and no cooldown is
    /// running.
    pub fn poll_allowed(&self, now_ms: u32) -> bool {
        !self.cooldown.is_armed() && self.poll.is_due(now_ms)
    }

    /// Record that the reader was interrogated at `now_ms`.
    pub fn mark_polled(&mut self, now_ms: u32) {
        self.poll.restart(now_ms);
    }

    /// Enter cooldown after a read (authorized, unauthorized or malformed).
    pub fn begin_cooldown(&mut self, now_ms: u32) {
        self.cooldown.arm(now_ms);
    }

    /// Leave cooldown if its duration has elapsed.  Returns `true` on the
    /// iteration the gate reopens.
    pub fn expire_cooldown(&mut self, now_ms: u32) -> bool {
        self.cooldown.poll(now_ms)
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown.is_armed()
    }
}

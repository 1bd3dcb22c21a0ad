//! Non-blocking timer primitives.
//!
//! Every timer in the terminal is a plain record compared against one
//! sampled clock value per loop iteration.  Nothing here sleeps or waits;
//! a timer that is not yet due simply reports `false` and the caller moves
//! on.
//!
//! All timestamps are milliseconds since boot truncated to `u32`.  The
//! counter wraps after ~49.7 days; [`period_elapsed`] uses wrapping
//! subtraction so a single wraparound between `last` and `now` is handled
//! correctly.

/// Periodic task guard: has at least `period_ms` elapsed since `last_ms`?
///
/// Side-effect free.  Callers update their stored timestamp themselves on
/// a positive result.
#[inline]
pub const fn period_elapsed(last_ms: u32, period_ms: u32, now_ms: u32) -> bool {
    now_ms.wrapping_sub(last_ms) >= period_ms
}

// ───────────────────────────────────────────────────────────────
// IntervalTimer
// ───────────────────────────────────────────────────────────────

/// Free-running timer record: `{ last_fired, period }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    last_fired_ms: u32,
    period_ms: u32,
}

impl IntervalTimer {
    /// Create a timer whose first period starts at `now_ms`.
    pub const fn new(period_ms: u32, now_ms: u32) -> Self {
        Self {
            last_fired_ms: now_ms,
            period_ms,
        }
    }

    /// Whether a full period has elapsed since the last fire.
    pub const fn is_due(&self, now_ms: u32) -> bool {
        period_elapsed(self.last_fired_ms, self.period_ms, now_ms)
    }

    /// Start a new period at `now_ms`.
    pub fn restart(&mut self, now_ms: u32) {
        self.last_fired_ms = now_ms;
    }

    /// Check-and-restart: returns `true` (and restarts) when due.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.is_due(now_ms) {
            self.last_fired_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub const fn last_fired_ms(&self) -> u32 {
        self.last_fired_ms
    }
}

// ───────────────────────────────────────────────────────────────
// OneShotTimer
// ───────────────────────────────────────────────────────────────

/// A timer that is explicitly armed and expires once.
///
/// Used for the reader cooldown and the indicator auto-off: both start on
/// an event rather than free-running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneShotTimer {
    armed_at_ms: Option<u32>,
    duration_ms: u32,
}

impl OneShotTimer {
    pub const fn new(duration_ms: u32) -> Self {
        Self {
            armed_at_ms: None,
            duration_ms,
        }
    }

    /// Arm (or re-arm) the timer at `now_ms`.
    pub fn arm(&mut self, now_ms: u32) {
        self.armed_at_ms = Some(now_ms);
    }

    pub fn disarm(&mut self) {
        self.armed_at_ms = None;
    }

    pub const fn is_armed(&self) -> bool {
        self.armed_at_ms.is_some()
    }

    /// Armed and the duration has elapsed.  Does not disarm.
    pub const fn expired(&self, now_ms: u32) -> bool {
        match self.armed_at_ms {
            Some(at) => period_elapsed(at, self.duration_ms, now_ms),
            None => false,
        }
    }

    /// Check-and-disarm: returns `true` exactly once per arming.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.expired(now_ms) {
            self.armed_at_ms = None;
            true
        } else {
            false
        }
    }

    pub const fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}

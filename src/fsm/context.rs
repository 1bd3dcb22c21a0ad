//! Blackboard shared by the session state handlers.
//!
//! The terminal writes the per-tick inputs (sampled time, button edge),
//! the handlers update the session record and raise output flags, and the
//! terminal turns those flags into presence resets, feed events and
//! display updates.

use crate::timing::IntervalTimer;

/// One countdown step.
pub const COUNTDOWN_STEP_MS: u32 = 1_000;

/// Inputs sampled by the terminal before each FSM tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionInputs {
    /// Timestamp sampled once for this loop iteration.
    pub now_ms: u32,
    /// Rising edge of the start button on this iteration.
    pub start_edge: bool,
}

/// Side effects requested by state handlers during one tick.
/// Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOutputs {
    /// Idle was entered (boot or countdown expiry).
    pub entered_idle: bool,
    /// Active was entered: clear presence, emit NEW_SESSION.
    pub entered_active: bool,
    /// `remaining_secs` changed.
    pub countdown_changed: bool,
    /// An Active session just ran out.
    pub session_ended: bool,
}

/// The session record plus the per-tick blackboard.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub inputs: SessionInputs,
    pub outputs: SessionOutputs,

    /// Seconds left in the running session; 0 while Idle.
    pub remaining_secs: u32,
    /// Configured full session length.
    pub session_length_secs: u32,
    /// Guards the once-per-second decrement (`lastTick`).
    pub second_timer: IntervalTimer,
}

impl SessionContext {
    pub fn new(session_length_secs: u32, now_ms: u32) -> Self {
        Self {
            inputs: SessionInputs {
                now_ms,
                start_edge: false,
            },
            outputs: SessionOutputs::default(),
            remaining_secs: 0,
            session_length_secs,
            second_timer: IntervalTimer::new(COUNTDOWN_STEP_MS, now_ms),
        }
    }

    /// Load this iteration's inputs and clear last iteration's outputs.
    pub fn begin_tick(&mut self, now_ms: u32, start_edge: bool) {
        self.inputs = SessionInputs { now_ms, start_edge };
        self.outputs = SessionOutputs::default();
    }

    /// Remaining time as `(minutes, seconds)`.
    pub fn remaining_mm_ss(&self) -> (u32, u32) {
        (self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

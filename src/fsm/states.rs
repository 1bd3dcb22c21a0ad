//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[start edge]──▶ ACTIVE ──┐
//!    ▲                      │  ▲   │ [1 s elapsed: remaining -= 1]
//!    │                      │  └───┘
//!    └──[remaining == 0]────┘
//! ```
//!
//! There is deliberately no pause, extend or cancel: a session runs from
//! the button press to zero.

use super::context::SessionContext;
use super::{StateDescriptor, StateId};
use log::{debug, info};

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Active
        StateDescriptor {
            id: StateId::Active,
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: Some(active_exit),
            on_update: active_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SessionContext) {
    ctx.remaining_secs = 0;
    ctx.outputs.entered_idle = true;
    info!("IDLE: waiting for start button");
}

fn idle_update(ctx: &mut SessionContext) -> Option<StateId> {
    if ctx.inputs.start_edge {
        return Some(StateId::Active);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE state: countdown running
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut SessionContext) {
    ctx.remaining_secs = ctx.session_length_secs;
    ctx.second_timer.restart(ctx.inputs.now_ms);
    ctx.outputs.entered_active = true;
    ctx.outputs.countdown_changed = true;
    info!("ACTIVE: session started, {}s on the clock", ctx.remaining_secs);
}

fn active_exit(ctx: &mut SessionContext) {
    ctx.outputs.session_ended = true;
    info!("ACTIVE: countdown expired");
}

fn active_update(ctx: &mut SessionContext) -> Option<StateId> {
    if ctx.inputs.start_edge {
        debug!("ACTIVE: start button ignored, session already running");
    }

    if !ctx.second_timer.poll(ctx.inputs.now_ms) {
        return None;
    }

    ctx.remaining_secs = ctx.remaining_secs.saturating_sub(1);
    ctx.outputs.countdown_changed = true;

    if ctx.remaining_secs == 0 {
        return Some(StateId::Idle);
    }
    None
}

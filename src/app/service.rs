//! Terminal service: the hexagonal core.
//!
//! [`Terminal`] owns the task table and a [`TerminalCore`] holding the
//! session FSM, presence engine, poll gate, indicator timer and the
//! injected ports.  One call to [`Terminal::tick`] is one control-loop
//! iteration.
//!
//! ```text
//!  SessionInputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  ReaderPort ────────▶ │          Terminal             │
//!                       │ Scheduler · FSM · Presence    │ ──▶ TextDisplayPort
//!  IndicatorPort ◀───── │ PollGate · IndicatorTimer     │ ──▶ NumericDisplayPort
//!                       └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::TerminalConfig;
use crate::error::{Error, Result};
use crate::edge::EdgeDetector;
use crate::fsm::context::SessionContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::gate::PollGate;
use crate::indicator::{Indicator, IndicatorTimer};
use crate::presence::{Presence, PresenceEngine, ScanOutcome};
use crate::registry::{CardUid, Registry};
use crate::scheduler::{Scheduler, Task};

use super::events::TerminalEvent;
use super::ports::{EventSink, TerminalHardware};

// ───────────────────────────────────────────────────────────────
// Screen text
// ───────────────────────────────────────────────────────────────

const IDLE_TOP: &str = "Press button";
const IDLE_BOTTOM: &str = "to start session";
const ACTIVE_TOP: &str = "Session running";
const ACTIVE_BOTTOM: &str = "Scan your card";
const LOGIN_TOP: &str = "Welcome";
const LOGOUT_TOP: &str = "Goodbye";
const REJECT_TOP: &str = "Access denied";
const REJECT_BOTTOM: &str = "Unknown card";

// ───────────────────────────────────────────────────────────────
// TerminalCore: everything the tasks operate on
// ───────────────────────────────────────────────────────────────

/// Shared context handed to every scheduled task.
pub struct TerminalCore<H, S> {
    hw: H,
    sink: S,
    fsm: Fsm,
    session: SessionContext,
    presence: PresenceEngine,
    gate: PollGate,
    indicator: IndicatorTimer,
    start_button: EdgeDetector,
    /// Edge seen by the edge task, consumed by the session task.
    pending_edge: bool,
    last_outcome: Option<ScanOutcome>,
}

impl<H: TerminalHardware, S: EventSink> TerminalCore<H, S> {
    fn new(config: &TerminalConfig, registry: Registry, hw: H, sink: S, now_ms: u32) -> Self {
        Self {
            hw,
            sink,
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            session: SessionContext::new(config.session_length_secs, now_ms),
            presence: PresenceEngine::new(registry),
            gate: PollGate::new(
                config.reader_poll_interval_ms,
                config.reader_cooldown_ms,
                now_ms,
            ),
            indicator: IndicatorTimer::new(config.indicator_blink_ms),
            start_button: EdgeDetector::new(),
            pending_edge: false,
            last_outcome: None,
        }
    }

    // ── Session side effects ──────────────────────────────────

    /// Turn the flags raised by the state handlers into port calls.
    fn apply_session_outputs(&mut self) {
        let out = self.session.outputs;

        if out.entered_active {
            self.presence.reset();
            self.sink.emit(&TerminalEvent::SessionStarted);
            self.show_status();
        }
        if out.countdown_changed {
            self.refresh_readout();
        }
        if out.session_ended {
            self.sink.emit(&TerminalEvent::SessionEnded);
        }
        if out.entered_idle {
            self.hw.show_placeholder();
            self.show_status();
        }
    }

    /// Remaining time while Active, placeholder otherwise.
    fn refresh_readout(&mut self) {
        if self.fsm.current_state() == StateId::Active {
            let (mm, ss) = self.session.remaining_mm_ss();
            // Session length is capped at 99:59, so this always fits.
            let value = u16::try_from(mm * 100 + ss).unwrap_or(9959);
            self.hw.show_value(value);
        } else {
            self.hw.show_placeholder();
        }
    }

    // ── Reader ────────────────────────────────────────────────

    fn poll_reader(&mut self, now_ms: u32) {
        if !self.gate.poll_allowed(now_ms) {
            return;
        }
        self.gate.mark_polled(now_ms);

        if !self.hw.card_present() {
            return;
        }

        let uid = self.hw.read_identifier();
        self.gate.begin_cooldown(now_ms);

        let outcome = match uid.as_deref() {
            Some(id) => self.presence.scan(id),
            None => {
                warn!("reader: card present but no identifier read");
                ScanOutcome::Unauthorized
            }
        };
        self.report_outcome(outcome, uid, now_ms);
    }

    fn report_outcome(&mut self, outcome: ScanOutcome, uid: Option<CardUid>, now_ms: u32) {
        self.last_outcome = Some(outcome);
        let event = match outcome {
            ScanOutcome::Login(index) | ScanOutcome::Logout(index) => {
                let Some(identity) = self.presence.identity(index) else {
                    return;
                };
                let (id, name) = (identity.id.clone(), identity.name.clone());
                if matches!(outcome, ScanOutcome::Login(_)) {
                    self.hw.show(LOGIN_TOP, &name);
                    TerminalEvent::Login { id, name }
                } else {
                    self.hw.show(LOGOUT_TOP, &name);
                    TerminalEvent::Logout { id, name }
                }
            }
            ScanOutcome::Unauthorized => {
                self.hw.show(REJECT_TOP, REJECT_BOTTOM);
                TerminalEvent::Rejected { id: uid }
            }
        };
        let which = if outcome.is_authorized() {
            Indicator::Success
        } else {
            Indicator::Error
        };
        self.indicator.flash(which, now_ms, &mut self.hw);
        self.sink.emit(&event);
    }

    /// Status screen for the current session state.
    fn show_status(&mut self) {
        match self.fsm.current_state() {
            StateId::Idle => self.hw.show(IDLE_TOP, IDLE_BOTTOM),
            StateId::Active => self.hw.show(ACTIVE_TOP, ACTIVE_BOTTOM),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tasks (evaluation order = registration order)
// ───────────────────────────────────────────────────────────────

fn edge_task<H: TerminalHardware, S: EventSink>(core: &mut TerminalCore<H, S>, _now_ms: u32) {
    let level = core.hw.start_pressed();
    core.pending_edge = core.start_button.update(level);
}

fn session_task<H: TerminalHardware, S: EventSink>(core: &mut TerminalCore<H, S>, now_ms: u32) {
    let edge = std::mem::take(&mut core.pending_edge);
    core.session.begin_tick(now_ms, edge);
    core.fsm.tick(&mut core.session);
    core.apply_session_outputs();
}

/// The scan message stays up while its indicator is lit.
fn indicator_task<H: TerminalHardware, S: EventSink>(core: &mut TerminalCore<H, S>, now_ms: u32) {
    if core.indicator.expire(now_ms, &mut core.hw) {
        core.show_status();
    }
}

fn cooldown_task<H: TerminalHardware, S: EventSink>(core: &mut TerminalCore<H, S>, now_ms: u32) {
    if core.gate.expire_cooldown(now_ms) {
        debug!("reader: cooldown over at {}ms", now_ms);
    }
}

fn reader_task<H: TerminalHardware, S: EventSink>(core: &mut TerminalCore<H, S>, now_ms: u32) {
    core.poll_reader(now_ms);
}

fn render_task<H: TerminalHardware, S: EventSink>(core: &mut TerminalCore<H, S>, _now_ms: u32) {
    core.refresh_readout();
}

// ───────────────────────────────────────────────────────────────
// Terminal
// ───────────────────────────────────────────────────────────────

/// The attendance terminal: task table plus the context it drives.
pub struct Terminal<H, S> {
    scheduler: Scheduler<TerminalCore<H, S>>,
    core: TerminalCore<H, S>,
    tick_count: u64,
}

impl<H: TerminalHardware, S: EventSink> Terminal<H, S> {
    /// Build the terminal and its task table.  Fails on an invalid
    /// `config`.  Does **not** start the session FSM; call [`start`](Self::start).
    pub fn new(
        config: &TerminalConfig,
        registry: Registry,
        hw: H,
        sink: S,
        now_ms: u32,
    ) -> Result<Self> {
        config.validate()?;
        let core = TerminalCore::new(config, registry, hw, sink, now_ms);
        let mut scheduler = Scheduler::new();

        let tasks: [Task<TerminalCore<H, S>>; 6] = [
            Task { label: "edge-detect", period_ms: 0, run: edge_task::<H, S> },
            Task { label: "session-tick", period_ms: 0, run: session_task::<H, S> },
            Task { label: "indicator-off", period_ms: 0, run: indicator_task::<H, S> },
            Task { label: "reader-cooldown", period_ms: 0, run: cooldown_task::<H, S> },
            Task { label: "reader-poll", period_ms: 0, run: reader_task::<H, S> },
            Task {
                label: "render",
                period_ms: config.render_interval_ms,
                run: render_task::<H, S>,
            },
        ];
        for task in tasks {
            scheduler
                .add(task, now_ms)
                .ok_or(Error::Init("task table full"))?;
        }

        Ok(Self {
            scheduler,
            core,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter Idle: placeholder readout, "press to start" screen.
    pub fn start(&mut self) {
        self.core.fsm.start(&mut self.core.session);
        self.core.apply_session_outputs();
        self.core.sink.emit(&TerminalEvent::Started);
        info!(
            "Terminal started: {} identities, {} tasks",
            self.core.presence.registry().len(),
            self.scheduler.len()
        );
    }

    /// One control-loop iteration against a single clock sample.
    pub fn tick(&mut self, now_ms: u32) {
        self.tick_count += 1;
        self.scheduler.tick(&mut self.core, now_ms);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.core.fsm.current_state()
    }

    /// Seconds left in the running session; 0 while Idle.
    pub fn remaining_secs(&self) -> u32 {
        self.core.session.remaining_secs
    }

    /// Presence of a card holder, `None` for unknown identifiers.
    pub fn presence_of(&self, id: &str) -> Option<Presence> {
        self.core.presence.presence_of(id)
    }

    pub fn inside_count(&self) -> usize {
        self.core.presence.table().inside_count()
    }

    pub fn in_cooldown(&self) -> bool {
        self.core.gate.in_cooldown()
    }

    pub fn indicator_lit(&self, which: Indicator) -> bool {
        self.core.indicator.is_lit(which)
    }

    /// Outcome of the most recent read, if any.
    pub fn last_outcome(&self) -> Option<ScanOutcome> {
        self.core.last_outcome
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Task labels in evaluation order.
    pub fn task_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scheduler.labels()
    }

    pub fn hardware(&self) -> &H {
        &self.core.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.core.hw
    }

    pub fn sink(&self) -> &S {
        &self.core.sink
    }
}

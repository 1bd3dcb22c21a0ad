//! Cooperative task scheduler.
//!
//! The control loop samples the clock once per iteration and hands that
//! timestamp to [`Scheduler::tick`].  The scheduler walks a fixed, ordered
//! table of task records and runs each one whose period has elapsed.
//! Nothing blocks: a task that is not due is skipped for this iteration.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Task table (registration order = evaluation order)          │
//! │  ┌──────────────────┬───────────┬──────────────┬──────────┐  │
//! │  │ label            │ period_ms │ last_fired   │ run      │  │
//! │  ├──────────────────┼───────────┼──────────────┼──────────┤  │
//! │  │ edge-detect      │ 0         │ …            │ fn(C, t) │  │
//! │  │ session-tick     │ 0         │ …            │ fn(C, t) │  │
//! │  │ indicator-off    │ 0         │ …            │ fn(C, t) │  │
//! │  │ reader-cooldown  │ 0         │ …            │ fn(C, t) │  │
//! │  │ reader-poll      │ 0         │ …            │ fn(C, t) │  │
//! │  │ render           │ 250       │ …            │ fn(C, t) │  │
//! │  └──────────────────┴───────────┴──────────────┴──────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A period of zero means "every iteration"; such tasks carry their own
//! timers when their deadlines move at run time (cooldown, indicator).
//! The context type `C` is whatever the tasks operate on, so the table can
//! be exercised in isolation with a fake clock.

use heapless::Vec;
use log::info;

use crate::timing::period_elapsed;

/// Maximum number of tasks (stack-allocated).
pub const MAX_TASKS: usize = 8;

/// Signature of a task body.  Receives the shared context and the sampled
/// timestamp for this iteration.
pub type TaskFn<C> = fn(&mut C, u32);

/// Static description of a task.
pub struct Task<C> {
    /// Human-readable label, used in logs.
    pub label: &'static str,
    /// Minimum spacing between runs; 0 = every iteration.
    pub period_ms: u32,
    pub run: TaskFn<C>,
}

/// Internal bookkeeping for a registered task.
struct TaskEntry<C> {
    task: Task<C>,
    last_fired_ms: u32,
    enabled: bool,
}

/// The scheduler engine.
pub struct Scheduler<C> {
    tasks: Vec<TaskEntry<C>, MAX_TASKS>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a task; its first period starts at `now_ms`.
    /// Returns the slot index, or `None` if the table is full.
    pub fn add(&mut self, task: Task<C>, now_ms: u32) -> Option<usize> {
        let slot = self.tasks.len();
        let (label, period_ms) = (task.label, task.period_ms);
        self.tasks
            .push(TaskEntry {
                task,
                last_fired_ms: now_ms,
                enabled: true,
            })
            .ok()?;
        info!(
            "Scheduler: added '{}' at slot {} (period {}ms)",
            label, slot, period_ms
        );
        Some(slot)
    }

    /// Enable or disable one task.  Out-of-range slots are ignored.
    pub fn set_enabled(&mut self, slot: usize, enabled: bool) {
        if let Some(entry) = self.tasks.get_mut(slot) {
            entry.enabled = enabled;
        }
    }

    /// Restart a task's period at `now_ms`.
    pub fn restart(&mut self, slot: usize, now_ms: u32) {
        if let Some(entry) = self.tasks.get_mut(slot) {
            entry.last_fired_ms = now_ms;
        }
    }

    /// Run every enabled, due task in registration order.
    /// Returns how many tasks ran.
    pub fn tick(&mut self, ctx: &mut C, now_ms: u32) -> usize {
        let mut ran = 0;
        for entry in self.tasks.iter_mut() {
            if !entry.enabled {
                continue;
            }
            if !period_elapsed(entry.last_fired_ms, entry.task.period_ms, now_ms) {
                continue;
            }
            entry.last_fired_ms = now_ms;
            (entry.task.run)(ctx, now_ms);
            ran += 1;
        }
        ran
    }

    /// Labels in evaluation order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.iter().map(|e| e.task.label)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of enabled tasks.
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|e| e.enabled).count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

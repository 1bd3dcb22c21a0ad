//! Mock hardware for integration tests.
//!
//! One mock per port, all sharing a [`BoardState`] so tests can drive the
//! inputs (button, card in the field) and inspect the outputs (text rows,
//! readout, indicators) while the terminal owns the mocks.  The mocks are
//! composed through the real [`HardwareAdapter`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rollcall::adapters::hardware::HardwareAdapter;
use rollcall::app::events::TerminalEvent;
use rollcall::app::ports::{
    ClockPort, EventSink, IndicatorPort, NumericDisplayPort, ReaderPort, SessionInputPort,
    TextDisplayPort,
};
use rollcall::feed::FeedRecord;
use rollcall::registry::CardUid;

// ── Board state ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readout {
    Blank,
    Value(u16),
    Placeholder,
}

#[derive(Debug)]
pub struct BoardState {
    // Inputs
    pub pressed: bool,
    pub card: Option<String>,
    /// Card detected but the identifier read fails.
    pub read_fails: bool,

    // Observations
    pub presence_checks: u32,
    pub lines: [String; 2],
    pub readout: Readout,
    pub readout_writes: u32,
    pub success: bool,
    pub error: bool,
    pub success_flashes: u32,
    pub error_flashes: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            pressed: false,
            card: None,
            read_fails: false,
            presence_checks: 0,
            lines: [String::new(), String::new()],
            readout: Readout::Blank,
            readout_writes: 0,
            success: false,
            error: false,
            success_flashes: 0,
            error_flashes: 0,
        }
    }
}

pub type Shared = Rc<RefCell<BoardState>>;

// ── Per-port mocks ────────────────────────────────────────────

pub struct MockReader(Shared);

impl ReaderPort for MockReader {
    fn card_present(&mut self) -> bool {
        let mut s = self.0.borrow_mut();
        s.presence_checks += 1;
        s.card.is_some()
    }

    fn read_identifier(&mut self) -> Option<CardUid> {
        let s = self.0.borrow();
        if s.read_fails {
            return None;
        }
        s.card.as_deref().and_then(|c| CardUid::try_from(c).ok())
    }
}

pub struct MockText(Shared);

impl TextDisplayPort for MockText {
    fn clear(&mut self) {
        let mut s = self.0.borrow_mut();
        s.lines = [String::new(), String::new()];
    }

    fn write_line(&mut self, row: u8, text: &str) {
        let mut s = self.0.borrow_mut();
        if let Some(line) = s.lines.get_mut(usize::from(row)) {
            *line = text.to_string();
        }
    }
}

pub struct MockNumeric(Shared);

impl NumericDisplayPort for MockNumeric {
    fn show_value(&mut self, value: u16) {
        let mut s = self.0.borrow_mut();
        s.readout = Readout::Value(value);
        s.readout_writes += 1;
    }

    fn show_placeholder(&mut self) {
        let mut s = self.0.borrow_mut();
        s.readout = Readout::Placeholder;
        s.readout_writes += 1;
    }
}

pub struct MockLeds(Shared);

impl IndicatorPort for MockLeds {
    fn set_success(&mut self, on: bool) {
        let mut s = self.0.borrow_mut();
        s.success = on;
        if on {
            s.success_flashes += 1;
        }
    }

    fn set_error(&mut self, on: bool) {
        let mut s = self.0.borrow_mut();
        s.error = on;
        if on {
            s.error_flashes += 1;
        }
    }
}

pub struct MockButton(Shared);

impl SessionInputPort for MockButton {
    fn start_pressed(&mut self) -> bool {
        self.0.borrow().pressed
    }
}

pub type MockBoard = HardwareAdapter<MockReader, MockText, MockNumeric, MockLeds, MockButton>;

/// A board plus a handle to its shared state.
pub fn mock_board() -> (MockBoard, Shared) {
    let state: Shared = Rc::new(RefCell::new(BoardState::default()));
    let board = HardwareAdapter::new(
        MockReader(state.clone()),
        MockText(state.clone()),
        MockNumeric(state.clone()),
        MockLeds(state.clone()),
        MockButton(state.clone()),
    );
    (board, state)
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<TerminalEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    /// What a serial sink would have written.
    pub fn feed_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(FeedRecord::from_event)
            .map(|r| r.to_string())
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&TerminalEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &TerminalEvent) {
        self.events.push(event.clone());
    }
}

// ── Fake clock ────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeClock {
    now: Cell<u32>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) -> u32 {
        let next = self.now.get().wrapping_add(ms);
        self.now.set(next);
        next
    }
}

impl ClockPort for FakeClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

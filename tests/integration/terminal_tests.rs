//! End-to-end terminal behaviour against the mock board.

use rollcall::app::events::TerminalEvent;
use rollcall::app::service::Terminal;
use rollcall::config::TerminalConfig;
use rollcall::fsm::StateId;
use rollcall::indicator::Indicator;
use rollcall::presence::{Presence, ScanOutcome};
use rollcall::registry::Registry;

use crate::mock_hw::{mock_board, FakeClock, MockBoard, Readout, RecordingSink, Shared};

const ADA: &str = "04 AB CD EF";
const BRIAN: &str = "04 12 34 56";
const STRANGER: &str = "DE AD BE EF";

// ── Harness ───────────────────────────────────────────────────

struct Rig {
    terminal: Terminal<MockBoard, RecordingSink>,
    board: Shared,
    clock: FakeClock,
}

impl Rig {
    fn new(config: TerminalConfig) -> Self {
        let registry = Registry::from_pairs([(ADA, "Ada"), (BRIAN, "Brian")]).unwrap();
        let (hw, board) = mock_board();
        let clock = FakeClock::at(0);
        let mut terminal =
            Terminal::new(&config, registry, hw, RecordingSink::default(), 0).unwrap();
        terminal.start();
        Self {
            terminal,
            board,
            clock,
        }
    }

    fn default_rig() -> Self {
        Self::new(TerminalConfig::default())
    }

    fn tick_at(&mut self, ms: u32) {
        self.clock.set(ms);
        self.terminal.tick(ms);
    }

    /// Tick every `step` ms from the current time up to and including `until`.
    fn run_until(&mut self, until: u32, step: u32) {
        let mut now = self.clock.advance(0);
        while now < until {
            now = (now + step).min(until);
            self.tick_at(now);
        }
    }

    /// Press and release the start button across two iterations.
    fn press_start(&mut self, at: u32) {
        self.board.borrow_mut().pressed = true;
        self.tick_at(at);
        self.board.borrow_mut().pressed = false;
        self.tick_at(at + 1);
    }

    /// Hold a card in the field for exactly one iteration.
    fn scan(&mut self, id: &str, at: u32) {
        self.board.borrow_mut().card = Some(id.to_string());
        self.tick_at(at);
        self.board.borrow_mut().card = None;
    }

    fn events(&self) -> &[TerminalEvent] {
        &self.terminal.sink().events
    }

    fn feed(&self) -> Vec<String> {
        self.terminal.sink().feed_lines()
    }

    fn lines(&self) -> [String; 2] {
        self.board.borrow().lines.clone()
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn boot_shows_idle_screen_and_placeholder() {
    let rig = Rig::default_rig();
    assert_eq!(rig.terminal.state(), StateId::Idle);
    assert_eq!(rig.board.borrow().readout, Readout::Placeholder);
    assert_eq!(rig.lines()[0], "Press button");
    assert_eq!(rig.events(), &[TerminalEvent::Started]);
    assert!(rig.feed().is_empty());
}

// ── Full attendance scenario ─────────────────────────────────

#[test]
fn session_login_login_logout_produces_feed() {
    let mut rig = Rig::default_rig();

    rig.press_start(10);
    assert_eq!(rig.terminal.state(), StateId::Active);

    rig.scan(ADA, 100);
    rig.scan(BRIAN, 2_100);
    rig.scan(ADA, 4_100);

    assert_eq!(
        rig.feed(),
        vec![
            "NEW_SESSION".to_string(),
            format!("LOGIN:{ADA},Ada"),
            format!("LOGIN:{BRIAN},Brian"),
            format!("LOGOUT:{ADA},Ada"),
        ]
    );
    assert_eq!(rig.terminal.presence_of(ADA), Some(Presence::Outside));
    assert_eq!(rig.terminal.presence_of(BRIAN), Some(Presence::Inside));
    assert_eq!(rig.terminal.inside_count(), 1);
    assert_eq!(rig.board.borrow().success_flashes, 3);
    assert_eq!(rig.lines(), ["Goodbye".to_string(), "Ada".to_string()]);
}

#[test]
fn login_shows_welcome_and_lights_success() {
    let mut rig = Rig::default_rig();
    rig.press_start(10);
    rig.scan(ADA, 100);

    assert_eq!(rig.lines(), ["Welcome".to_string(), "Ada".to_string()]);
    assert!(rig.board.borrow().success);
    assert!(!rig.board.borrow().error);
    assert!(rig.terminal.indicator_lit(Indicator::Success));
    assert!(matches!(rig.terminal.last_outcome(), Some(ScanOutcome::Login(_))));
}

// ── Reader throttling ─────────────────────────────────────────

#[test]
fn card_left_on_reader_is_read_once_per_cooldown() {
    let mut rig = Rig::default_rig();
    rig.press_start(10);

    rig.board.borrow_mut().card = Some(ADA.to_string());
    rig.tick_at(100);
    assert!(rig.terminal.in_cooldown());

    // Whole cooldown with the card still in the field.
    rig.run_until(2_099, 5);
    assert_eq!(rig.feed().len(), 2, "only NEW_SESSION and one LOGIN");

    rig.tick_at(2_100);
    assert_eq!(rig.feed().last().unwrap(), &format!("LOGOUT:{ADA},Ada"));
}

#[test]
fn reader_is_not_interrogated_during_cooldown() {
    let mut rig = Rig::default_rig();
    rig.scan(ADA, 100);
    let checks = rig.board.borrow().presence_checks;

    rig.run_until(2_000, 5);
    assert_eq!(rig.board.borrow().presence_checks, checks);
}

#[test]
fn reader_polled_no_faster_than_interval() {
    let mut rig = Rig::default_rig();
    rig.run_until(1_000, 5);
    // Default interval 100ms: polls at 100, 200, ... 1000.
    assert_eq!(rig.board.borrow().presence_checks, 10);
}

// ── Rejections ────────────────────────────────────────────────

#[test]
fn unknown_card_is_rejected_without_feed_line() {
    let mut rig = Rig::default_rig();
    rig.press_start(10);
    rig.scan(STRANGER, 100);

    assert!(matches!(
        rig.events().last(),
        Some(TerminalEvent::Rejected { id: Some(id) }) if id.as_str() == STRANGER
    ));
    assert_eq!(rig.feed(), vec!["NEW_SESSION".to_string()]);
    assert_eq!(rig.lines(), ["Access denied".to_string(), "Unknown card".to_string()]);
    assert!(rig.board.borrow().error);
    assert_eq!(rig.terminal.inside_count(), 0);
    assert!(rig.terminal.in_cooldown());
}

#[test]
fn failed_read_is_rejected_and_starts_cooldown() {
    let mut rig = Rig::default_rig();
    {
        let mut b = rig.board.borrow_mut();
        b.card = Some(ADA.to_string());
        b.read_fails = true;
    }
    rig.tick_at(100);

    assert_eq!(
        rig.events().last(),
        Some(&TerminalEvent::Rejected { id: None })
    );
    assert_eq!(rig.board.borrow().error_flashes, 1);
    assert!(rig.terminal.in_cooldown());
    assert_eq!(rig.terminal.presence_of(ADA), Some(Presence::Outside));
}

// ── Indicators ────────────────────────────────────────────────

#[test]
fn indicator_turns_off_after_blink_duration() {
    let mut rig = Rig::default_rig();
    rig.scan(ADA, 100);
    assert!(rig.board.borrow().success);

    rig.tick_at(1_099);
    assert!(rig.board.borrow().success);

    rig.tick_at(1_100);
    assert!(!rig.board.borrow().success);
    assert!(!rig.terminal.indicator_lit(Indicator::Success));
}

#[test]
fn rejection_after_login_switches_indicator() {
    let mut rig = Rig::new(TerminalConfig {
        reader_cooldown_ms: 200,
        ..TerminalConfig::default()
    });
    rig.scan(ADA, 100);
    rig.scan(STRANGER, 300);
    {
        let b = rig.board.borrow();
        assert!(!b.success);
        assert!(b.error);
    }
    assert!(!rig.terminal.indicator_lit(Indicator::Success));

    // Shared timer restarted by the second flash.
    rig.tick_at(1_299);
    assert!(rig.board.borrow().error);

    rig.tick_at(1_300);
    let b = rig.board.borrow();
    assert!(!b.success);
    assert!(!b.error);
}

#[test]
fn status_screen_returns_when_indicator_goes_dark() {
    let mut rig = Rig::default_rig();
    rig.press_start(10);
    rig.scan(ADA, 100);
    assert_eq!(rig.lines()[0], "Welcome");

    rig.tick_at(1_099);
    assert_eq!(rig.lines()[0], "Welcome");

    rig.tick_at(1_100);
    assert_eq!(
        rig.lines(),
        ["Session running".to_string(), "Scan your card".to_string()]
    );
}

#[test]
fn idle_prompt_returns_after_rejection() {
    let mut rig = Rig::default_rig();
    rig.scan(STRANGER, 100);
    assert_eq!(rig.lines()[0], "Access denied");

    rig.run_until(1_100, 10);
    assert_eq!(
        rig.lines(),
        ["Press button".to_string(), "to start session".to_string()]
    );
}

// ── Session lifecycle ─────────────────────────────────────────

#[test]
fn countdown_runs_to_zero_and_returns_to_idle() {
    let mut rig = Rig::new(TerminalConfig {
        session_length_secs: 3,
        ..TerminalConfig::default()
    });
    rig.press_start(10);
    assert_eq!(rig.terminal.remaining_secs(), 3);
    assert_eq!(rig.board.borrow().readout, Readout::Value(3));

    rig.tick_at(1_010);
    assert_eq!(rig.terminal.remaining_secs(), 2);
    assert_eq!(rig.board.borrow().readout, Readout::Value(2));

    rig.run_until(3_009, 5);
    assert_eq!(rig.terminal.state(), StateId::Active);

    rig.tick_at(3_010);
    assert_eq!(rig.terminal.state(), StateId::Idle);
    assert_eq!(rig.terminal.remaining_secs(), 0);
    assert_eq!(rig.board.borrow().readout, Readout::Placeholder);
    assert_eq!(rig.lines()[0], "Press button");
    assert_eq!(
        rig.terminal
            .sink()
            .count(|e| *e == TerminalEvent::SessionEnded),
        1
    );

    // Stays idle afterwards.
    rig.run_until(10_000, 50);
    assert_eq!(rig.terminal.sink().count(|e| *e == TerminalEvent::SessionEnded), 1);
}

#[test]
fn readout_shows_minutes_and_seconds() {
    let mut rig = Rig::new(TerminalConfig {
        session_length_secs: 125,
        ..TerminalConfig::default()
    });
    rig.press_start(10);
    assert_eq!(rig.board.borrow().readout, Readout::Value(205));

    rig.tick_at(1_010);
    rig.tick_at(2_010);
    rig.tick_at(3_010);
    rig.tick_at(4_010);
    rig.tick_at(5_010);
    assert_eq!(rig.board.borrow().readout, Readout::Value(200));

    rig.tick_at(6_010);
    assert_eq!(rig.board.borrow().readout, Readout::Value(159));
}

#[test]
fn press_while_active_is_ignored() {
    let mut rig = Rig::new(TerminalConfig {
        session_length_secs: 60,
        ..TerminalConfig::default()
    });
    rig.press_start(10);
    rig.tick_at(1_010);
    assert_eq!(rig.terminal.remaining_secs(), 59);

    rig.press_start(1_500);
    assert_eq!(rig.terminal.remaining_secs(), 59);
    assert_eq!(rig.terminal.sink().count(|e| *e == TerminalEvent::SessionStarted), 1);
}

#[test]
fn held_button_does_not_restart_after_expiry() {
    let mut rig = Rig::new(TerminalConfig {
        session_length_secs: 1,
        ..TerminalConfig::default()
    });
    rig.board.borrow_mut().pressed = true;
    rig.run_until(5_000, 10);
    assert_eq!(rig.terminal.state(), StateId::Idle);
    assert_eq!(rig.terminal.sink().count(|e| *e == TerminalEvent::SessionStarted), 1);

    rig.board.borrow_mut().pressed = false;
    rig.tick_at(5_010);
    rig.press_start(5_020);
    assert_eq!(rig.terminal.state(), StateId::Active);
}

#[test]
fn presence_survives_expiry_and_resets_on_next_session() {
    let mut rig = Rig::new(TerminalConfig {
        session_length_secs: 5,
        ..TerminalConfig::default()
    });
    rig.press_start(10);
    rig.scan(ADA, 100);
    rig.run_until(6_000, 10);
    assert_eq!(rig.terminal.state(), StateId::Idle);
    assert_eq!(rig.terminal.presence_of(ADA), Some(Presence::Inside));

    rig.press_start(6_010);
    assert_eq!(rig.terminal.presence_of(ADA), Some(Presence::Outside));

    // First scan of the new session is a login again.
    rig.scan(ADA, 6_200);
    assert_eq!(rig.feed().last().unwrap(), &format!("LOGIN:{ADA},Ada"));
}

#[test]
fn scans_are_processed_while_idle() {
    let mut rig = Rig::default_rig();
    rig.scan(ADA, 100);
    assert_eq!(rig.terminal.state(), StateId::Idle);
    assert_eq!(rig.terminal.presence_of(ADA), Some(Presence::Inside));
    assert_eq!(rig.feed(), vec![format!("LOGIN:{ADA},Ada")]);
}

// ── Rendering ─────────────────────────────────────────────────

#[test]
fn render_task_refreshes_readout_on_its_interval() {
    let mut rig = Rig::default_rig();
    let before = rig.board.borrow().readout_writes;

    rig.tick_at(249);
    assert_eq!(rig.board.borrow().readout_writes, before);

    rig.tick_at(250);
    assert_eq!(rig.board.borrow().readout_writes, before + 1);
    assert_eq!(rig.board.borrow().readout, Readout::Placeholder);
}

#[test]
fn tick_counter_and_task_order() {
    let mut rig = Rig::default_rig();
    rig.run_until(50, 5);
    assert_eq!(rig.terminal.tick_count(), 10);
    let labels: Vec<_> = rig.terminal.task_labels().collect();
    assert_eq!(
        labels,
        [
            "edge-detect",
            "session-tick",
            "indicator-off",
            "reader-cooldown",
            "reader-poll",
            "render"
        ]
    );
}

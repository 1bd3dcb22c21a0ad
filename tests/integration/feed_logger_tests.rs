//! Terminal → serial feed → attendance log, end to end.
//!
//! The terminal writes through a real [`SerialEventSink`] into a byte
//! buffer; the buffer is then replayed line by line into an
//! [`AttendanceLog`], exactly as the logging station would see it.

use rollcall::adapters::nvs::NvsAdapter;
use rollcall::adapters::serial_sink::SerialEventSink;
use rollcall::app::ports::{ConfigPort, RosterPort};
use rollcall::app::service::Terminal;
use rollcall::config::TerminalConfig;
use rollcall::feed::FeedRecord;
use rollcall::logger::{Applied, AttendanceLog, IngestStats, LogoutPolicy};

use crate::mock_hw::{mock_board, MockBoard, Shared};

const ROSTER: &str = r#"[
    {"id": "04 AB CD EF", "name": "Ada"},
    {"id": "04 12 34 56", "name": "Brian"},
    {"id": "04 99 88 77", "name": "Chidi"}
]"#;

type FeedTerminal = Terminal<MockBoard, SerialEventSink<Vec<u8>>>;

fn boot(store: &NvsAdapter) -> (FeedTerminal, Shared) {
    let config = store.load().unwrap();
    let registry = store.load_roster().unwrap();
    let (hw, board) = mock_board();
    let mut terminal =
        Terminal::new(&config, registry, hw, SerialEventSink::new(Vec::new()), 0).unwrap();
    terminal.start();
    (terminal, board)
}

fn provisioned_store(config: &TerminalConfig) -> NvsAdapter {
    let store = NvsAdapter::new();
    store.save(config).unwrap();
    store.save_roster_json(ROSTER).unwrap();
    store
}

fn press(terminal: &mut FeedTerminal, board: &Shared, at: u32) {
    board.borrow_mut().pressed = true;
    terminal.tick(at);
    board.borrow_mut().pressed = false;
    terminal.tick(at + 1);
}

fn scan(terminal: &mut FeedTerminal, board: &Shared, id: &str, at: u32) {
    board.borrow_mut().card = Some(id.to_string());
    terminal.tick(at);
    board.borrow_mut().card = None;
}

fn feed_text(terminal: &FeedTerminal) -> String {
    String::from_utf8(terminal.sink().get_ref().clone()).unwrap()
}

fn replay(log: &mut AttendanceLog, text: &str) -> Vec<Applied> {
    text.lines()
        .enumerate()
        .map(|(i, line)| log.apply_line(line, i as u64).unwrap())
        .collect()
}

fn names(log: &AttendanceLog) -> Vec<String> {
    log.listing().map(|r| r.name.clone()).collect()
}

#[test]
fn feed_lines_rebuild_the_attendance_table() {
    let store = provisioned_store(&TerminalConfig::default());
    let (mut terminal, board) = boot(&store);

    press(&mut terminal, &board, 10);
    scan(&mut terminal, &board, "04 AB CD EF", 100);
    scan(&mut terminal, &board, "04 12 34 56", 2_100);
    scan(&mut terminal, &board, "04 99 88 77", 4_100);
    scan(&mut terminal, &board, "04 AB CD EF", 6_100);

    let text = feed_text(&terminal);
    assert_eq!(terminal.sink().lines_written(), 5);
    assert!(text.lines().all(|l| FeedRecord::parse(l).is_ok()));

    let mut log = AttendanceLog::new(LogoutPolicy::Remove);
    let applied = replay(&mut log, &text);
    assert_eq!(
        applied,
        vec![
            Applied::Cleared,
            Applied::Inserted,
            Applied::Inserted,
            Applied::Inserted,
            Applied::Removed,
        ]
    );
    assert_eq!(names(&log), ["Chidi", "Brian"]);
}

#[test]
fn retain_policy_keeps_logged_out_rows() {
    let store = provisioned_store(&TerminalConfig::default());
    let (mut terminal, board) = boot(&store);

    press(&mut terminal, &board, 10);
    scan(&mut terminal, &board, "04 AB CD EF", 100);
    scan(&mut terminal, &board, "04 AB CD EF", 2_100);
    scan(&mut terminal, &board, "04 AB CD EF", 4_100);

    let mut log = AttendanceLog::new(LogoutPolicy::Retain);
    let applied = replay(&mut log, &feed_text(&terminal));
    assert_eq!(
        applied,
        vec![
            Applied::Cleared,
            Applied::Inserted,
            Applied::Retained,
            Applied::DuplicateIgnored,
        ]
    );
    assert_eq!(names(&log), ["Ada"]);
}

#[test]
fn next_session_clears_the_table() {
    let config = TerminalConfig {
        session_length_secs: 2,
        ..TerminalConfig::default()
    };
    let store = provisioned_store(&config);
    let (mut terminal, board) = boot(&store);

    press(&mut terminal, &board, 10);
    scan(&mut terminal, &board, "04 AB CD EF", 100);
    for now in (200..=3_000).step_by(100) {
        terminal.tick(now);
    }
    press(&mut terminal, &board, 3_100);
    scan(&mut terminal, &board, "04 12 34 56", 3_200);

    let mut log = AttendanceLog::default();
    replay(&mut log, &feed_text(&terminal));
    assert_eq!(names(&log), ["Brian"]);
}

#[test]
fn rejected_cards_never_reach_the_feed() {
    let store = provisioned_store(&TerminalConfig::default());
    let (mut terminal, board) = boot(&store);

    scan(&mut terminal, &board, "00 00 00 00", 100);
    assert_eq!(terminal.sink().lines_written(), 0);
    assert!(feed_text(&terminal).is_empty());
}

#[test]
fn unprovisioned_store_boots_with_defaults_and_no_roster() {
    let store = NvsAdapter::new();
    let (mut terminal, board) = boot(&store);

    scan(&mut terminal, &board, "04 AB CD EF", 100);
    assert_eq!(terminal.inside_count(), 0);
    assert!(feed_text(&terminal).is_empty());
    assert_eq!(board.borrow().error_flashes, 1);
}

#[test]
fn logger_ingests_the_serial_stream_directly() {
    let store = provisioned_store(&TerminalConfig::default());
    let (mut terminal, board) = boot(&store);

    press(&mut terminal, &board, 10);
    scan(&mut terminal, &board, "04 AB CD EF", 100);
    scan(&mut terminal, &board, "04 12 34 56", 2_100);

    // Line noise between terminal output and a truncated tail.
    let mut wire = terminal.sink().get_ref().clone();
    wire.extend_from_slice(b"\x00\xfe\n\r\nLOGOUT:04 AB");

    let mut log = AttendanceLog::default();
    let mut seconds = 0;
    let stats = log
        .ingest(wire.as_slice(), || {
            seconds += 1;
            seconds
        })
        .unwrap();

    assert_eq!(stats, IngestStats { applied: 3, skipped: 2 });
    assert_eq!(names(&log), ["Brian", "Ada"]);
}

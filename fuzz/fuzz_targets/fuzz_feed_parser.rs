//! Fuzz target: `FeedRecord::parse` and `AttendanceLog::apply_line`
//!
//! Splits arbitrary bytes into lines and replays them into an attendance
//! log.  The parser must never panic, accepted lines must re-encode to a
//! line that parses to the same record, and the table must never hold a
//! name twice.
//!
//! cargo fuzz run fuzz_feed_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollcall::feed::FeedRecord;
use rollcall::logger::{AttendanceLog, LogoutPolicy};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let policy = if data.first().is_some_and(|b| b & 1 == 1) {
        LogoutPolicy::Retain
    } else {
        LogoutPolicy::Remove
    };
    let mut log = AttendanceLog::new(policy);

    for (t, line) in text.lines().enumerate() {
        if let Ok(record) = FeedRecord::parse(line) {
            let again = FeedRecord::parse(&record.to_string());
            assert_eq!(again.as_ref(), Ok(&record), "canonical line must re-parse");
        }
        let _ = log.apply_line(line, t as u64);
    }

    let mut names: Vec<&str> = log.listing().map(|r| r.name.as_str()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total, "duplicate name in attendance table");
});

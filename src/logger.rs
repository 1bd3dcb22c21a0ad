//! Downstream attendance log.
//!
//! Materializes the serial feed into a table of who checked in this
//! session.  Runs on the receiving host, not on the terminal; it lives in
//! this crate so both ends share one feed codec.
//!
//! ```text
//!   NEW_SESSION ──▶ clear every row
//!   LOGIN       ──▶ insert (timestamp, name) unless the name is present
//!   LOGOUT      ──▶ LogoutPolicy::Remove → delete the name's row
//!                   LogoutPolicy::Retain → keep it
//! ```
//!
//! The duplicate check is keyed on the name, which mirrors the terminal's
//! presence toggle: one row per person per session.

use core::fmt::Write as _;
use std::io::{self, BufRead};

use log::{debug, info, warn};

use crate::feed::{FeedError, FeedRecord};

/// What a LOGOUT line does to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoutPolicy {
    /// Delete the person's row (the log shows who is currently in).
    #[default]
    Remove,
    /// Keep the row (the log shows who attended at all).
    Retain,
}

/// One logged check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// Insertion sequence, never reused within the log's lifetime.
    pub seq: u64,
    /// Seconds since the epoch (or any caller-chosen origin).
    pub timestamp_secs: u64,
    pub name: String,
}

/// What [`AttendanceLog::apply`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Cleared,
    Inserted,
    DuplicateIgnored,
    Removed,
    /// LOGOUT for a name with no row.
    NotFound,
    /// LOGOUT under [`LogoutPolicy::Retain`].
    Retained,
}

/// Line counts from one [`AttendanceLog::ingest`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub applied: usize,
    /// Malformed or unrecognized lines.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct AttendanceLog {
    rows: Vec<LogRow>,
    next_seq: u64,
    policy: LogoutPolicy,
}

impl Default for AttendanceLog {
    fn default() -> Self {
        Self::new(LogoutPolicy::default())
    }
}

impl AttendanceLog {
    pub fn new(policy: LogoutPolicy) -> Self {
        Self {
            rows: Vec::new(),
            next_seq: 1,
            policy,
        }
    }

    pub fn apply(&mut self, record: &FeedRecord, timestamp_secs: u64) -> Applied {
        match record {
            FeedRecord::NewSession => {
                self.rows.clear();
                info!("log: new session, table cleared");
                Applied::Cleared
            }
            FeedRecord::Login { name, .. } => {
                if self.contains(name) {
                    info!("log: duplicate check-in ignored for {}", name);
                    return Applied::DuplicateIgnored;
                }
                self.rows.push(LogRow {
                    seq: self.next_seq,
                    timestamp_secs,
                    name: name.clone(),
                });
                self.next_seq += 1;
                info!("log: {} checked in", name);
                Applied::Inserted
            }
            FeedRecord::Logout { name, .. } => match self.policy {
                LogoutPolicy::Retain => Applied::Retained,
                LogoutPolicy::Remove => {
                    let before = self.rows.len();
                    self.rows.retain(|r| r.name != *name);
                    if self.rows.len() < before {
                        info!("log: {} removed", name);
                        Applied::Removed
                    } else {
                        warn!("log: {} not found for logout", name);
                        Applied::NotFound
                    }
                }
            },
        }
    }

    /// Decode and apply one raw feed line.  Malformed and unknown lines
    /// are logged and returned as errors; the log is left untouched.
    pub fn apply_line(&mut self, line: &str, timestamp_secs: u64) -> Result<Applied, FeedError> {
        match FeedRecord::parse(line) {
            Ok(record) => Ok(self.apply(&record, timestamp_secs)),
            Err(FeedError::Malformed) => {
                warn!("log: malformed feed line '{}'", line.trim());
                Err(FeedError::Malformed)
            }
            Err(e) => Err(e),
        }
    }

    /// Read feed lines from `reader` until end of stream.
    ///
    /// Bytes are decoded lossily, blank lines are ignored, and bad lines
    /// are skipped.  `clock` stamps each line.  Only an I/O error stops
    /// the loop.
    pub fn ingest<R: BufRead>(
        &mut self,
        mut reader: R,
        mut clock: impl FnMut() -> u64,
    ) -> io::Result<IngestStats> {
        let mut stats = IngestStats::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => return Ok(stats),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }
            match self.apply_line(&line, clock()) {
                Ok(_) => stats.applied += 1,
                Err(e) => {
                    debug!("log: skipped line ({})", e);
                    stats.skipped += 1;
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rows.iter().any(|r| r.name == name)
    }

    /// Rows, newest first.
    pub fn listing(&self) -> impl Iterator<Item = &LogRow> {
        self.rows.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn policy(&self) -> LogoutPolicy {
        self.policy
    }

    /// Plain-text table of [`listing`](Self::listing).
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:>5}  {:>12}  Name", "#", "Timestamp");
        for row in self.listing() {
            let _ = writeln!(out, "{:>5}  {:>12}  {}", row.seq, row.timestamp_secs, row.name);
        }
        out
    }
}

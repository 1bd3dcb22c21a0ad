//! Serial event-feed sink.
//!
//! Implements [`EventSink`] by writing one feed line per feed event to any
//! [`std::io::Write`] (the UART on the device, a `Vec<u8>` in tests).
//! Local-only events go to the logger instead.

use std::io::Write;

use log::{info, warn};

use crate::app::events::TerminalEvent;
use crate::app::ports::EventSink;
use crate::feed::FeedRecord;

pub struct SerialEventSink<W> {
    out: W,
    /// Lines written successfully.
    lines: u32,
}

impl<W: Write> SerialEventSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn lines_written(&self) -> u32 {
        self.lines
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, record: &FeedRecord) {
        let result = writeln!(self.out, "{record}").and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.lines += 1,
            Err(e) => warn!("feed: write failed: {}", e),
        }
    }
}

impl<W: Write> EventSink for SerialEventSink<W> {
    fn emit(&mut self, event: &TerminalEvent) {
        if event.is_feed_event() {
            if let Some(record) = FeedRecord::from_event(event) {
                self.write_line(&record);
            }
            return;
        }
        match event {
            TerminalEvent::Started => info!("EVENT | terminal started"),
            TerminalEvent::SessionEnded => info!("EVENT | session ended"),
            TerminalEvent::Rejected { id: Some(id) } => info!("EVENT | rejected card {}", id),
            TerminalEvent::Rejected { id: None } => info!("EVENT | rejected unreadable card"),
            _ => {}
        }
    }
}

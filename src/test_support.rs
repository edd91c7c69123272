//! Test utilities.
//!
//! [`TestDriver`] is a scripted [`TerminalDriver`]: it replays a fixed
//! event sequence, records every patch the diff flush emits, and counts
//! raw-mode acquire/release calls so teardown behaviour is observable.
//! Reading past the end of the script is an error - a run that never
//! received its `Done` event should fail loudly, not hang.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::event::Event;
use crate::runtime::TerminalDriver;
use crate::screen::{CellPatch, ScreenSink};

/// Scripted driver for exercising the event loop without a terminal.
pub struct TestDriver {
    events: VecDeque<Event>,
    size: (u16, u16),
    /// Every patch applied, in order, across all flushes.
    pub patches: Vec<CellPatch>,
    /// Number of non-empty flushes.
    pub flushes: usize,
    /// Raw-mode acquire calls.
    pub acquires: usize,
    /// Raw-mode release calls.
    pub releases: usize,
}

impl TestDriver {
    pub fn new(size: (u16, u16), events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            size,
            patches: Vec::new(),
            flushes: 0,
            acquires: 0,
            releases: 0,
        }
    }

    /// Glyphs currently on a given row, per the applied patches.
    pub fn row_text(&self, y: u16, width: u16) -> String {
        let mut row = vec![' '; width as usize];
        for patch in &self.patches {
            if patch.y == y && (patch.x as usize) < row.len() {
                row[patch.x as usize] = patch.cell.ch;
            }
        }
        row.into_iter().collect()
    }
}

impl ScreenSink for TestDriver {
    fn apply(&mut self, patch: &CellPatch) -> io::Result<()> {
        self.patches.push(*patch);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

impl TerminalDriver for TestDriver {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }

    fn read_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "event script exhausted before the loop terminated",
            )),
        }
    }

    fn acquire(&mut self) -> io::Result<()> {
        self.acquires += 1;
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        self.releases += 1;
        Ok(())
    }
}

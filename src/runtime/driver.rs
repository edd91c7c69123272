//! Terminal driver boundary.
//!
//! The event loop talks to the terminal only through [`TerminalDriver`]:
//! dimension queries, timed input reads, raw-mode acquire/release, and the
//! [`ScreenSink`] half that receives the diff flush. The stock
//! implementation wraps crossterm; tests substitute a scripted driver.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, execute, queue, terminal};

use crate::event::{convert_event, Event};
use crate::screen::{CellPatch, ScreenSink};
use crate::types::{Attr, Rgba};

/// Everything the loop needs from a terminal.
///
/// `release` must be idempotent: the loop guarantees one call on every
/// exit path, and a driver's own drop backstop may try again.
pub trait TerminalDriver: ScreenSink {
    /// Current terminal dimensions in cells.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Wait up to `timeout` for the next input event.
    ///
    /// `Ok(None)` means no routable event arrived in time; the loop polls
    /// again after draining its handoff queue.
    fn read_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;

    /// Enter raw mode and claim the screen.
    fn acquire(&mut self) -> io::Result<()>;

    /// Restore the terminal. Safe to call more than once.
    fn release(&mut self) -> io::Result<()>;
}

// =============================================================================
// CrosstermDriver
// =============================================================================

/// Stock driver: raw mode + alternate screen + mouse capture over stdout.
pub struct CrosstermDriver {
    out: Stdout,
    raw: bool,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            raw: false,
        }
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.ansi_index())
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

impl ScreenSink for CrosstermDriver {
    fn apply(&mut self, patch: &CellPatch) -> io::Result<()> {
        let cell = patch.cell;
        queue!(
            self.out,
            cursor::MoveTo(patch.x, patch.y),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_color(cell.fg)),
            SetBackgroundColor(to_color(cell.bg)),
        )?;
        for (flag, attribute) in [
            (Attr::BOLD, Attribute::Bold),
            (Attr::DIM, Attribute::Dim),
            (Attr::ITALIC, Attribute::Italic),
            (Attr::UNDERLINE, Attribute::Underlined),
            (Attr::BLINK, Attribute::SlowBlink),
            (Attr::INVERSE, Attribute::Reverse),
            (Attr::HIDDEN, Attribute::Hidden),
            (Attr::STRIKETHROUGH, Attribute::CrossedOut),
        ] {
            if cell.attrs.contains(flag) {
                queue!(self.out, SetAttribute(attribute))?;
            }
        }
        queue!(self.out, Print(cell.ch))?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl TerminalDriver for CrosstermDriver {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn read_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if poll(timeout)? {
            Ok(convert_event(read()?))
        } else {
            Ok(None)
        }
    }

    fn acquire(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
        )?;
        self.raw = true;
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        execute!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for CrosstermDriver {
    fn drop(&mut self) {
        if self.raw {
            let _ = self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_conversion() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_color(Rgba::ansi(12)), Color::AnsiValue(12));
        assert_eq!(
            to_color(Rgba::rgb(1, 2, 3)),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}

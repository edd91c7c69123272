//! Differential flush.
//!
//! Compares the current frame to the previously flushed frame cell by cell
//! and emits only the cells that changed. Two identical frames produce no
//! sink calls at all, so an idle UI costs zero terminal I/O.

use std::io;

use crate::types::Cell;

use super::Screen;

/// One changed cell: position plus its full new contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPatch {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// Receiver for diff output.
///
/// [`ScreenSink::flush`] is called once per [`Screen::diff_and_flush`]
/// that emitted at least one patch; a clean frame never touches the sink.
pub trait ScreenSink {
    fn apply(&mut self, patch: &CellPatch) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Screen {
    /// Emit every cell that changed since the last flush, then snapshot
    /// the current frame as the new comparison base.
    ///
    /// Returns the number of patches emitted. Not safe to call while draw
    /// operations for the frame are still in flight.
    pub fn diff_and_flush(&mut self, sink: &mut dyn ScreenSink) -> io::Result<usize> {
        let (current, previous, width) = self.frames();
        let mut emitted = 0usize;

        for (i, cell) in current.iter().enumerate() {
            if previous[i] != *cell {
                // continuation markers are covered by the wide glyph to
                // their left; emitting them would overwrite its right half
                if cell.is_continuation() {
                    continue;
                }
                let x = (i % width as usize) as u16;
                let y = (i / width as usize) as u16;
                sink.apply(&CellPatch { x, y, cell: *cell })?;
                emitted += 1;
            }
        }

        if emitted > 0 {
            sink.flush()?;
            previous.copy_from_slice(current);
        }
        Ok(emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rgba};

    #[derive(Default)]
    struct RecordingSink {
        patches: Vec<CellPatch>,
        flushes: usize,
    }

    impl ScreenSink for RecordingSink {
        fn apply(&mut self, patch: &CellPatch) -> io::Result<()> {
            self.patches.push(*patch);
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn write_one(screen: &mut Screen, text: &str, x: i32, y: i32) {
        screen.write(
            text,
            x,
            y,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
    }

    #[test]
    fn identical_frames_emit_nothing() {
        let mut screen = Screen::new(10, 4);
        let mut sink = RecordingSink::default();

        write_one(&mut screen, "hi", 0, 0);
        let n = screen.diff_and_flush(&mut sink).unwrap();
        assert_eq!(n, 2);
        assert_eq!(sink.flushes, 1);

        // second flush with no draws in between: zero patches, zero flushes
        let n = screen.diff_and_flush(&mut sink).unwrap();
        assert_eq!(n, 0);
        assert_eq!(sink.patches.len(), 2);
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn single_cell_change_emits_single_patch() {
        let mut screen = Screen::new(8, 3);
        let mut sink = RecordingSink::default();
        write_one(&mut screen, "abc", 0, 1);
        screen.diff_and_flush(&mut sink).unwrap();

        sink.patches.clear();
        write_one(&mut screen, "x", 1, 1);
        let n = screen.diff_and_flush(&mut sink).unwrap();
        assert_eq!(n, 1);
        assert_eq!(sink.patches.len(), 1);
        let patch = sink.patches[0];
        assert_eq!((patch.x, patch.y), (1, 1));
        assert_eq!(patch.cell.ch, 'x');
    }

    #[test]
    fn attribute_only_change_is_a_change() {
        let mut screen = Screen::new(4, 1);
        let mut sink = RecordingSink::default();
        write_one(&mut screen, "a", 0, 0);
        screen.diff_and_flush(&mut sink).unwrap();

        screen.write(
            "a",
            0,
            0,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::BOLD,
        );
        let n = screen.diff_and_flush(&mut sink).unwrap();
        assert_eq!(n, 1);
        assert_eq!(sink.patches.last().unwrap().cell.attrs, Attr::BOLD);
    }

    #[test]
    fn resize_forces_repaint_of_drawn_cells() {
        let mut screen = Screen::new(4, 2);
        let mut sink = RecordingSink::default();
        write_one(&mut screen, "ab", 0, 0);
        screen.diff_and_flush(&mut sink).unwrap();

        screen.resize(6, 2);
        write_one(&mut screen, "ab", 0, 0);
        let n = screen.diff_and_flush(&mut sink).unwrap();
        assert_eq!(n, 2);
    }
}

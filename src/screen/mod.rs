//! Character-grid screen buffer.
//!
//! The screen holds two frames of cells: the one being drawn and the one
//! last flushed to the terminal. Draw operations write into the current
//! frame with silent clipping; [`Screen::diff_and_flush`] emits only the
//! cells that differ from the previous frame.
//!
//! Uses flat storage with row-major indexing: `index = y * width + x`.

mod diff;

pub use diff::{CellPatch, ScreenSink};

use unicode_width::UnicodeWidthChar;

use crate::geom::Rect;
use crate::types::{Attr, BorderStyle, Cell, Rgba};

/// Double-buffered grid of terminal cells.
///
/// Both frames always share dimensions; [`Screen::resize`] reinitializes
/// them together.
#[derive(Debug, Clone)]
pub struct Screen {
    width: u16,
    height: u16,
    current: Vec<Cell>,
    previous: Vec<Cell>,
}

impl Screen {
    /// Create a screen filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            current: vec![Cell::default(); size],
            previous: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Full screen area as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Get a cell from the current frame (None if out of bounds).
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.current[self.index(x, y)])
        } else {
            None
        }
    }

    /// Resize the screen, reinitializing both frames to default cells.
    ///
    /// The next flush after a resize therefore repaints everything that is
    /// not a default cell.
    pub fn resize(&mut self, width: u16, height: u16) {
        let size = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.current = vec![Cell::default(); size];
        self.previous = vec![Cell::default(); size];
    }

    /// Set one cell, silently ignoring out-of-bounds coordinates.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if self.in_bounds(x, y) {
            let idx = self.index(x as u16, y as u16);
            self.current[idx] = cell;
        }
    }

    /// Write a string starting at (x, y), clipped to the screen bounds.
    ///
    /// Writes advance by display width; a wide glyph occupies two cells,
    /// the second holding a continuation marker the diff flush never
    /// emits (the glyph itself already covers that column). Off-screen
    /// prefixes and suffixes are dropped without error.
    pub fn write(&mut self, text: &str, x: i32, y: i32, fg: Rgba, bg: Rgba, attrs: Attr) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let mut cx = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if cx >= self.width as i32 {
                break;
            }
            if cx >= 0 {
                self.set(cx, y, Cell { ch, fg, bg, attrs });
                if w == 2 {
                    let marker = Cell {
                        ch: Cell::CONTINUATION,
                        fg,
                        bg,
                        attrs,
                    };
                    self.set(cx + 1, y, marker);
                }
            }
            cx += w;
        }
    }

    /// Clear a rectangle back to default cells.
    pub fn clear(&mut self, rect: Rect) {
        self.fill(rect, Cell::default());
    }

    /// Fill a rectangle with one cell value, clipped to bounds.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.bounds());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Fill a rectangle's background, keeping default glyphs.
    pub fn background(&mut self, rect: Rect, bg: Rgba) {
        self.fill(
            rect,
            Cell {
                bg,
                ..Cell::default()
            },
        );
    }

    /// Draw a one-cell border just inside `rect`.
    ///
    /// No-op when the rectangle is too small to hold a frame.
    pub fn border(&mut self, rect: Rect, style: BorderStyle, fg: Rgba, bg: Rgba, attrs: Attr) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let (h, v, tl, tr, br, bl) = style.chars();
        let right = rect.x + rect.width - 1;
        let bottom = rect.y + rect.height - 1;

        for x in (rect.x + 1)..right {
            self.set(x, rect.y, Cell { ch: h, fg, bg, attrs });
            self.set(x, bottom, Cell { ch: h, fg, bg, attrs });
        }
        for y in (rect.y + 1)..bottom {
            self.set(rect.x, y, Cell { ch: v, fg, bg, attrs });
            self.set(right, y, Cell { ch: v, fg, bg, attrs });
        }
        self.set(rect.x, rect.y, Cell { ch: tl, fg, bg, attrs });
        self.set(right, rect.y, Cell { ch: tr, fg, bg, attrs });
        self.set(right, bottom, Cell { ch: br, fg, bg, attrs });
        self.set(rect.x, bottom, Cell { ch: bl, fg, bg, attrs });
    }

    /// Forget the previously flushed frame.
    ///
    /// The next [`Screen::diff_and_flush`] repaints every cell that is not
    /// a default cell; used after the terminal contents can no longer be
    /// trusted (full-redraw requests).
    pub fn invalidate(&mut self) {
        self.previous.fill(Cell::default());
    }

    pub(crate) fn frames(&mut self) -> (&[Cell], &mut Vec<Cell>, u16) {
        (&self.current, &mut self.previous, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_clips_silently() {
        let mut screen = Screen::new(5, 2);
        screen.write(
            "hello world",
            2,
            0,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
        assert_eq!(screen.get(2, 0).unwrap().ch, 'h');
        assert_eq!(screen.get(4, 0).unwrap().ch, 'l');
        // entirely off-screen writes are fine
        screen.write(
            "x",
            -10,
            0,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
        screen.write(
            "x",
            0,
            7,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
    }

    #[test]
    fn write_negative_x_keeps_visible_tail() {
        let mut screen = Screen::new(5, 1);
        screen.write(
            "abcd",
            -2,
            0,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
        assert_eq!(screen.get(0, 0).unwrap().ch, 'c');
        assert_eq!(screen.get(1, 0).unwrap().ch, 'd');
    }

    #[test]
    fn wide_glyph_takes_two_cells() {
        let mut screen = Screen::new(6, 1);
        screen.write(
            "你a",
            0,
            0,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
        assert_eq!(screen.get(0, 0).unwrap().ch, '你');
        assert!(screen.get(1, 0).unwrap().is_continuation());
        assert_eq!(screen.get(2, 0).unwrap().ch, 'a');
    }

    #[test]
    fn fill_and_clear_roundtrip() {
        let mut screen = Screen::new(4, 4);
        let cell = Cell {
            ch: '#',
            fg: Rgba::RED,
            bg: Rgba::BLACK,
            attrs: Attr::BOLD,
        };
        screen.fill(Rect::new(1, 1, 2, 2), cell);
        assert_eq!(screen.get(1, 1).unwrap().ch, '#');
        assert_eq!(screen.get(0, 0).unwrap().ch, ' ');
        screen.clear(Rect::new(0, 0, 4, 4));
        assert_eq!(*screen.get(1, 1).unwrap(), Cell::default());
    }

    #[test]
    fn fill_clips_out_of_bounds_rect() {
        let mut screen = Screen::new(3, 3);
        screen.fill(Rect::new(-5, -5, 100, 100), Cell::glyph('x'));
        assert_eq!(screen.get(0, 0).unwrap().ch, 'x');
        assert_eq!(screen.get(2, 2).unwrap().ch, 'x');
    }

    #[test]
    fn border_draws_frame() {
        let mut screen = Screen::new(4, 3);
        screen.border(
            Rect::new(0, 0, 4, 3),
            BorderStyle::Single,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
        assert_eq!(screen.get(0, 0).unwrap().ch, '┌');
        assert_eq!(screen.get(3, 0).unwrap().ch, '┐');
        assert_eq!(screen.get(0, 2).unwrap().ch, '└');
        assert_eq!(screen.get(3, 2).unwrap().ch, '┘');
        assert_eq!(screen.get(1, 0).unwrap().ch, '─');
        assert_eq!(screen.get(0, 1).unwrap().ch, '│');
        // interior untouched
        assert_eq!(screen.get(1, 1).unwrap().ch, ' ');
    }

    #[test]
    fn border_noop_when_too_small() {
        let mut screen = Screen::new(4, 3);
        screen.border(
            Rect::new(0, 0, 1, 3),
            BorderStyle::Single,
            Rgba::TERMINAL_DEFAULT,
            Rgba::TERMINAL_DEFAULT,
            Attr::NONE,
        );
        assert_eq!(screen.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn resize_reinitializes_both_frames() {
        let mut screen = Screen::new(3, 3);
        screen.set(0, 0, Cell::glyph('x'));
        screen.resize(5, 2);
        assert_eq!(screen.width(), 5);
        assert_eq!(screen.height(), 2);
        assert_eq!(*screen.get(0, 0).unwrap(), Cell::default());
    }
}

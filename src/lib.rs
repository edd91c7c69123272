//! # trellis-tui
//!
//! Retained-mode terminal UI runtime: a view tree, a grid layout engine,
//! a double-buffered screen with diffed rendering, and a single-threaded
//! event loop.
//!
//! ## Architecture
//!
//! Application code builds a tree of views (boxes, grids, lists), hands
//! the root to an [`EventLoop`] together with a [`Theme`], and the loop
//! does the rest:
//!
//! ```text
//! driver input → typed Event → view handlers → layout → draw → diff flush
//! ```
//!
//! All state lives on the loop thread. Other threads feed events in
//! through [`EventSender`]; a view (or the application) terminates the
//! loop by dispatching the `Done` sentinel, which also releases the
//! terminal's raw mode on the way out.
//!
//! ## Modules
//!
//! - [`types`] - Colors, cell attributes, border glyph tables
//! - [`geom`] - Integer rectangles
//! - [`screen`] - Double-buffered cell grid and diff flush
//! - [`style`] - Theme, style tags, directive rendering, truncation
//! - [`layout`] - Grid track sizing
//! - [`view`] - The view tree (box, grid, list cell, list)
//! - [`event`] - The typed event envelope
//! - [`runtime`] - The event loop and terminal driver

pub mod event;
pub mod geom;
pub mod layout;
pub mod runtime;
pub mod screen;
pub mod style;
pub mod test_support;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::{Attr, BorderStyle, Cell, Rgba};

pub use geom::Rect;

pub use screen::{CellPatch, Screen, ScreenSink};

pub use style::{
    dark, default_theme, render_value, truncate_text, truncate_value, Locale, StyleError,
    StyleSpec, Theme,
};

pub use layout::{size_tracks, track_positions, Track};

pub use view::{
    find_view_mut, BoxView, DrawContext, EventContext, GridView, ListCell, ListView, View,
    ViewId,
};

pub use event::{
    Event, Key, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseKind, SystemEvent, ViewEvent,
    ViewEventKind,
};

pub use runtime::{CrosstermDriver, EventLoop, EventSender, RuntimeError, TerminalDriver};

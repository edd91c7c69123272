//! Typed event envelope and input conversion.
//!
//! Every event the loop dispatches is one arm of the [`Event`] union: key
//! input, mouse input, system/lifecycle, or view-originated. Each arm
//! carries only the strongly-typed payload it needs; there is no generic
//! attribute bag.
//!
//! Conversion from crossterm's event types lives here so the rest of the
//! crate never sees the backend's types.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use crate::view::ViewId;

// =============================================================================
// Keyboard
// =============================================================================

/// Decoded key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
    };
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

// =============================================================================
// Mouse
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down,
    Up,
    Drag,
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse action at a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

// =============================================================================
// System / lifecycle
// =============================================================================

/// Events originating from the terminal or the application rather than a
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    /// Terminal dimensions changed.
    Resize(u16, u16),
    /// Full repaint requested.
    Redraw,
}

// =============================================================================
// View events
// =============================================================================

/// Payloads a view can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEventKind {
    /// Terminal sentinel: the loop tears down and exits after dispatching
    /// this.
    Done,
    /// A list's selection moved.
    SelectionChanged { index: Option<usize> },
    /// A list item was activated (Enter / double action).
    ItemActivated { index: usize },
}

/// A view-originated event.
///
/// `origin` is a non-owning id; it identifies where the event came from
/// and stops resolving once that view leaves the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    pub origin: Option<ViewId>,
    pub kind: ViewEventKind,
}

impl ViewEvent {
    pub const fn of(origin: ViewId, kind: ViewEventKind) -> Self {
        Self {
            origin: Some(origin),
            kind,
        }
    }
}

// =============================================================================
// The envelope
// =============================================================================

/// Everything the event loop dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    System(SystemEvent),
    View(ViewEvent),
}

impl Event {
    /// The terminal "done" signal with no originating view.
    pub const fn done() -> Self {
        Event::View(ViewEvent {
            origin: None,
            kind: ViewEventKind::Done,
        })
    }

    /// True iff this is the loop-terminating sentinel.
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            Event::View(ViewEvent {
                kind: ViewEventKind::Done,
                ..
            })
        )
    }
}

// =============================================================================
// Crossterm conversion
// =============================================================================

/// Convert a crossterm event into our envelope.
///
/// Returns None for event kinds the runtime does not route (focus
/// reporting, paste, key release).
pub fn convert_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key).map(Event::Key),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(convert_mouse_event(mouse))),
        CrosstermEvent::Resize(w, h) => Some(Event::System(SystemEvent::Resize(w, h))),
        _ => None,
    }
}

fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyEvent> {
    if event.kind == crossterm::event::KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(KeyEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
    })
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (kind, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseKind::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseKind::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseKind::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseKind::Moved, MouseButton::None),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
            (MouseKind::ScrollUp, MouseButton::None)
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
            (MouseKind::ScrollDown, MouseButton::None)
        }
    };
    MouseEvent {
        kind,
        button,
        x: event.column as i32,
        y: event.row as i32,
        modifiers: convert_modifiers(event.modifiers),
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_char_key() {
        let event = CrosstermEvent::Key(CrosstermKeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        ));
        let converted = convert_event(event).unwrap();
        match converted {
            Event::Key(k) => {
                assert_eq!(k.key, Key::Char('q'));
                assert!(k.modifiers.ctrl);
                assert!(!k.modifiers.alt);
            }
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn convert_arrow_and_function_keys() {
        for (code, key) in [
            (KeyCode::Up, Key::Up),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::F(5), Key::F(5)),
        ] {
            let event =
                CrosstermEvent::Key(CrosstermKeyEvent::new(code, KeyModifiers::NONE));
            match convert_event(event).unwrap() {
                Event::Key(k) => assert_eq!(k.key, key),
                other => panic!("expected key event, got {other:?}"),
            }
        }
    }

    #[test]
    fn convert_resize() {
        let converted = convert_event(CrosstermEvent::Resize(80, 24)).unwrap();
        assert_eq!(converted, Event::System(SystemEvent::Resize(80, 24)));
    }

    #[test]
    fn convert_mouse_scroll() {
        let event = CrosstermEvent::Mouse(CrosstermMouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 3,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        match convert_event(event).unwrap() {
            Event::Mouse(m) => {
                assert_eq!(m.kind, MouseKind::ScrollDown);
                assert_eq!((m.x, m.y), (3, 7));
            }
            other => panic!("expected mouse event, got {other:?}"),
        }
    }

    #[test]
    fn done_sentinel() {
        assert!(Event::done().is_done());
        assert!(!Event::System(SystemEvent::Redraw).is_done());
        let from_view = Event::View(ViewEvent::of(ViewId::next(), ViewEventKind::Done));
        assert!(from_view.is_done());
    }
}

//! List cell and the stock list built from cells.

use crate::event::{Event, Key, MouseButton, MouseKind, ViewEventKind};
use crate::geom::Rect;
use crate::screen::Screen;
use crate::style::{tags, truncate_text};
use crate::types::{Attr, BorderStyle, Rgba};

use super::{DrawContext, EventContext, Frame, View, ViewId};

// =============================================================================
// ListCell
// =============================================================================

/// Renders one data item's text on a single line.
///
/// The text is drawn at the rectangle's top-left and truncated with the
/// two-character ellipsis when it does not fit - never wrapped. Explicit
/// overrides win over the theme's item tags.
pub struct ListCell {
    id: ViewId,
    rect: Rect,
    text: String,
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
    selected: bool,
}

impl ListCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ViewId::next(),
            rect: Rect::ZERO,
            text: text.into(),
            fg: None,
            bg: None,
            attrs: None,
            selected: false,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_fg(&mut self, fg: Rgba) {
        self.fg = Some(fg);
    }

    pub fn set_bg(&mut self, bg: Rgba) {
        self.bg = Some(bg);
    }

    pub fn set_attrs(&mut self, attrs: Attr) {
        self.attrs = Some(attrs);
    }

    /// Clear the per-cell overrides back to theme styling.
    pub fn clear_overrides(&mut self) {
        self.fg = None;
        self.bg = None;
        self.attrs = None;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

impl View for ListCell {
    fn id(&self) -> ViewId {
        self.id
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn draw(&self, screen: &mut Screen, ctx: &DrawContext<'_>) {
        if self.rect.is_empty() {
            return;
        }
        let tag = if self.selected {
            tags::HIGHLIGHT
        } else {
            tags::ITEM_ENABLED
        };
        let spec = ctx.theme.style_or_default(tag);
        let fg = self.fg.or(spec.fg).unwrap_or(Rgba::TERMINAL_DEFAULT);
        let bg = self.bg.or(spec.bg).unwrap_or(Rgba::TERMINAL_DEFAULT);
        let attrs = self.attrs.unwrap_or(spec.attrs);

        // paint the full row so selection highlights read as a bar
        screen.fill(
            Rect::new(self.rect.x, self.rect.y, self.rect.width, 1),
            crate::types::Cell {
                ch: ' ',
                fg,
                bg,
                attrs,
            },
        );
        let text = truncate_text(&self.text, self.rect.width.max(0) as usize, "..");
        screen.write(&text, self.rect.x, self.rect.y, fg, bg, attrs);
    }
}

// =============================================================================
// ListView
// =============================================================================

/// Vertical list of items with a selection.
///
/// Up/Down/Enter (and wheel/click) move and activate the selection;
/// changes are announced as view events so sibling views can react.
pub struct ListView {
    frame: Frame,
    cells: Vec<ListCell>,
    selected: Option<usize>,
}

impl ListView {
    pub fn new() -> Self {
        Self {
            frame: Frame::new(),
            cells: Vec::new(),
            selected: None,
        }
    }

    pub fn set_border(&mut self, border: bool) {
        self.frame.border = border;
    }

    pub fn set_border_style(&mut self, style: BorderStyle) {
        self.frame.border_style = style;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.frame.title = Some(title.into());
    }

    pub fn set_bg(&mut self, bg: Rgba) {
        self.frame.bg = Some(bg);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.frame.visible = visible;
    }

    /// Replace the items. Selection resets when it no longer fits.
    pub fn set_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cells = items.into_iter().map(|s| ListCell::new(s)).collect();
        match self.selected {
            Some(s) if s < self.cells.len() => self.cells[s].set_selected(true),
            _ => self.selected = None,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected.map(|i| self.cells[i].text())
    }

    /// Per-cell style override access, e.g. to dim a disabled entry.
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut ListCell> {
        self.cells.get_mut(index)
    }

    fn select(&mut self, index: usize, ctx: &mut EventContext) {
        let index = index.min(self.cells.len().saturating_sub(1));
        if self.cells.is_empty() || self.selected == Some(index) {
            return;
        }
        if let Some(old) = self.selected {
            self.cells[old].set_selected(false);
        }
        self.selected = Some(index);
        self.cells[index].set_selected(true);
        ctx.emit(
            self.frame.id,
            ViewEventKind::SelectionChanged {
                index: self.selected,
            },
        );
    }

    fn step(&mut self, delta: i32, ctx: &mut EventContext) {
        if self.cells.is_empty() {
            return;
        }
        let next = match self.selected {
            None => 0,
            Some(current) => {
                let stepped = current as i32 + delta;
                stepped.clamp(0, self.cells.len() as i32 - 1) as usize
            }
        };
        self.select(next, ctx);
    }

    fn activate(&self, ctx: &mut EventContext) {
        if let Some(index) = self.selected {
            ctx.emit(self.frame.id, ViewEventKind::ItemActivated { index });
        }
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ListView {
    fn id(&self) -> ViewId {
        self.frame.id
    }

    fn rect(&self) -> Rect {
        self.frame.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.frame.rect = rect;
    }

    fn visible(&self) -> bool {
        self.frame.visible
    }

    fn layout(&mut self) {
        let inner = self.frame.inner_rect();
        let mut y = inner.y;
        for cell in &mut self.cells {
            cell.set_rect(Rect::new(inner.x, y, inner.width, 1));
            y += 1;
        }
    }

    fn draw(&self, screen: &mut Screen, ctx: &DrawContext<'_>) {
        if !self.frame.visible || self.frame.rect.is_empty() {
            return;
        }
        self.frame.draw_chrome(screen, ctx);
        let inner = self.frame.inner_rect();
        for cell in &self.cells {
            if cell.rect().y >= inner.bottom() {
                break;
            }
            cell.draw(screen, ctx);
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext) -> bool {
        match event {
            Event::Key(key) => match key.key {
                Key::Up => {
                    self.step(-1, ctx);
                    true
                }
                Key::Down => {
                    self.step(1, ctx);
                    true
                }
                Key::Enter => {
                    self.activate(ctx);
                    true
                }
                _ => false,
            },
            Event::Mouse(mouse) => {
                let inner = self.frame.inner_rect();
                match mouse.kind {
                    MouseKind::ScrollUp => {
                        self.step(-1, ctx);
                        true
                    }
                    MouseKind::ScrollDown => {
                        self.step(1, ctx);
                        true
                    }
                    MouseKind::Down if mouse.button == MouseButton::Left => {
                        if inner.contains(mouse.x, mouse.y) {
                            let index = (mouse.y - inner.y) as usize;
                            if index < self.cells.len() {
                                self.select(index, ctx);
                                ctx.request_focus(self.frame.id);
                                return true;
                            }
                        }
                        false
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyEvent, SystemEvent, ViewEvent};
    use crate::style::default_theme;

    fn key(k: Key) -> Event {
        Event::Key(KeyEvent::plain(k))
    }

    fn selection_events(ctx: &mut EventContext) -> Vec<Option<usize>> {
        ctx.take_queued()
            .into_iter()
            .filter_map(|e| match e {
                Event::View(ViewEvent {
                    kind: ViewEventKind::SelectionChanged { index },
                    ..
                }) => Some(index),
                _ => None,
            })
            .collect()
    }

    fn sample_list() -> ListView {
        let mut list = ListView::new();
        list.set_items(["alpha", "beta", "gamma"]);
        list.set_rect(Rect::new(0, 0, 10, 5));
        list.layout();
        list
    }

    #[test]
    fn arrow_keys_move_selection_and_emit() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();

        assert!(list.handle_event(&key(Key::Down), &mut ctx));
        assert_eq!(list.selected(), Some(0));
        assert!(list.handle_event(&key(Key::Down), &mut ctx));
        assert_eq!(list.selected(), Some(1));
        assert!(list.handle_event(&key(Key::Up), &mut ctx));
        assert_eq!(list.selected(), Some(0));

        assert_eq!(selection_events(&mut ctx), vec![Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn selection_clamps_at_ends() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        for _ in 0..10 {
            list.handle_event(&key(Key::Down), &mut ctx);
        }
        assert_eq!(list.selected(), Some(2));
        for _ in 0..10 {
            list.handle_event(&key(Key::Up), &mut ctx);
        }
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn enter_activates_selected() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        // no selection, no event
        assert!(list.handle_event(&key(Key::Enter), &mut ctx));
        assert!(ctx.take_queued().is_empty());

        list.handle_event(&key(Key::Down), &mut ctx);
        ctx.take_queued();
        list.handle_event(&key(Key::Enter), &mut ctx);
        let events = ctx.take_queued();
        assert!(matches!(
            &events[0],
            Event::View(ViewEvent {
                kind: ViewEventKind::ItemActivated { index: 0 },
                ..
            })
        ));
    }

    #[test]
    fn click_selects_row_under_pointer() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        let click = Event::Mouse(crate::event::MouseEvent {
            kind: MouseKind::Down,
            button: MouseButton::Left,
            x: 2,
            y: 2,
            modifiers: crate::event::Modifiers::NONE,
        });
        assert!(list.handle_event(&click, &mut ctx));
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn click_outside_items_not_consumed() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        let click = Event::Mouse(crate::event::MouseEvent {
            kind: MouseKind::Down,
            button: MouseButton::Left,
            x: 2,
            y: 4,
            modifiers: crate::event::Modifiers::NONE,
        });
        assert!(!list.handle_event(&click, &mut ctx));
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn non_input_events_ignored() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        assert!(!list.handle_event(&Event::System(SystemEvent::Redraw), &mut ctx));
    }

    #[test]
    fn cell_truncates_never_wraps() {
        let theme = default_theme();
        let mut screen = Screen::new(8, 2);
        let mut cell = ListCell::new("a very long item");
        cell.set_rect(Rect::new(0, 0, 8, 1));
        cell.draw(&mut screen, &DrawContext::new(&theme));

        assert_eq!(screen.get(0, 0).unwrap().ch, 'a');
        assert_eq!(screen.get(6, 0).unwrap().ch, '.');
        assert_eq!(screen.get(7, 0).unwrap().ch, '.');
        // nothing bleeds onto the next row
        assert_eq!(screen.get(0, 1).unwrap().ch, ' ');
    }

    #[test]
    fn cell_overrides_beat_theme() {
        let theme = default_theme();
        let mut screen = Screen::new(6, 1);
        let mut cell = ListCell::new("x");
        cell.set_fg(Rgba::RED);
        cell.set_attrs(Attr::UNDERLINE);
        cell.set_rect(Rect::new(0, 0, 6, 1));
        cell.draw(&mut screen, &DrawContext::new(&theme));

        let drawn = screen.get(0, 0).unwrap();
        assert_eq!(drawn.fg, Rgba::RED);
        assert_eq!(drawn.attrs, Attr::UNDERLINE);
    }

    #[test]
    fn selected_row_uses_highlight_tag() {
        let theme = default_theme();
        let mut screen = Screen::new(10, 5);
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        list.handle_event(&key(Key::Down), &mut ctx);
        list.draw(&mut screen, &DrawContext::new(&theme));

        // default theme highlight is inverse
        assert!(screen.get(0, 0).unwrap().attrs.contains(Attr::INVERSE));
        assert!(!screen.get(0, 1).unwrap().attrs.contains(Attr::INVERSE));
    }

    #[test]
    fn set_items_resets_out_of_range_selection() {
        let mut list = sample_list();
        let mut ctx = EventContext::new();
        list.handle_event(&key(Key::Down), &mut ctx);
        list.handle_event(&key(Key::Down), &mut ctx);
        list.handle_event(&key(Key::Down), &mut ctx);
        assert_eq!(list.selected(), Some(2));
        list.set_items(["only"]);
        assert_eq!(list.selected(), None);
    }
}

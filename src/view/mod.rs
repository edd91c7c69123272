//! Retained-mode view tree.
//!
//! Views are a closed set of node kinds behind one small trait: a plain
//! box, a grid container, a list cell and the stock list built from
//! cells. A parent owns its children; rectangles are assigned by the
//! parent's layout pass and never mutated by the view itself (the root is
//! sized by the runtime from the terminal dimensions).
//!
//! Views are identified by [`ViewId`] - a plain number, never a pointer -
//! so event back-references cannot keep a detached view alive or dangle.

mod box_view;
mod grid;
mod list;

pub use box_view::BoxView;
pub use grid::GridView;
pub use list::{ListCell, ListView};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::event::{Event, ViewEvent, ViewEventKind};
use crate::geom::Rect;
use crate::screen::Screen;
use crate::style::{tags, StyleSpec, Theme};
use crate::types::{Attr, BorderStyle, Rgba};

// =============================================================================
// ViewId
// =============================================================================

/// Process-unique, non-owning view identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

impl ViewId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// Draw / event contexts
// =============================================================================

/// Read-only capabilities threaded into every draw call.
///
/// The theme travels here explicitly; there is no ambient global lookup.
pub struct DrawContext<'a> {
    pub theme: &'a Theme,
    pub focus: Option<ViewId>,
}

impl<'a> DrawContext<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme, focus: None }
    }

    pub fn with_focus(theme: &'a Theme, focus: Option<ViewId>) -> Self {
        Self { theme, focus }
    }

    pub fn is_focused(&self, id: ViewId) -> bool {
        self.focus == Some(id)
    }
}

/// Mutable surface handed to event handlers.
///
/// Handlers use it to enqueue synthetic events (processed FIFO after the
/// current dispatch), request a re-layout, or move focus. This is the only
/// way a handler influences the loop.
#[derive(Debug, Default)]
pub struct EventContext {
    queued: VecDeque<Event>,
    layout_requested: bool,
    focus_request: Option<ViewId>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a synthetic event behind any already queued.
    pub fn dispatch(&mut self, event: Event) {
        self.queued.push_back(event);
    }

    /// Emit a view-originated event from `origin`.
    pub fn emit(&mut self, origin: ViewId, kind: ViewEventKind) {
        self.dispatch(Event::View(ViewEvent::of(origin, kind)));
    }

    /// Flag that a layout-relevant mutation happened.
    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    /// Ask the loop to move focus after this dispatch.
    pub fn request_focus(&mut self, id: ViewId) {
        self.focus_request = Some(id);
    }

    pub fn layout_requested(&self) -> bool {
        self.layout_requested
    }

    pub(crate) fn take_queued(&mut self) -> VecDeque<Event> {
        std::mem::take(&mut self.queued)
    }

    pub(crate) fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_requested)
    }

    pub(crate) fn take_focus_request(&mut self) -> Option<ViewId> {
        self.focus_request.take()
    }
}

// =============================================================================
// The View trait
// =============================================================================

/// A node in the scene graph.
///
/// `layout` recomputes child rectangles from this view's own rectangle;
/// `draw` renders into the screen buffer; `handle_event` returns whether
/// the event was consumed. All three run on the loop thread only.
pub trait View {
    fn id(&self) -> ViewId;

    fn rect(&self) -> Rect;

    /// Assign this view's rectangle. Called by the parent's layout pass
    /// (or by the runtime, for the root).
    fn set_rect(&mut self, rect: Rect);

    fn visible(&self) -> bool {
        true
    }

    /// Recompute child rectangles. Idempotent for unchanged inputs.
    fn layout(&mut self) {}

    fn draw(&self, screen: &mut Screen, ctx: &DrawContext<'_>);

    /// Handle one event; true means consumed.
    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext) -> bool {
        let _ = (event, ctx);
        false
    }

    fn children(&self) -> &[Box<dyn View>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        &mut []
    }
}

/// Depth-first search for a view by id.
///
/// Returns None when the id is not (or no longer) in the tree - a stale
/// id is harmless.
pub fn find_view_mut(root: &mut dyn View, id: ViewId) -> Option<&mut dyn View> {
    if root.id() == id {
        return Some(root);
    }
    for child in root.children_mut() {
        if let Some(found) = find_view_mut(child.as_mut(), id) {
            return Some(found);
        }
    }
    None
}

// =============================================================================
// Frame - chrome shared by the container views
// =============================================================================

/// Rectangle, colors, border and title shared by the boxed view kinds.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub id: ViewId,
    pub rect: Rect,
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub border: bool,
    pub border_style: BorderStyle,
    pub title: Option<String>,
    pub visible: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            id: ViewId::next(),
            rect: Rect::ZERO,
            fg: None,
            bg: None,
            border: false,
            border_style: BorderStyle::Single,
            title: None,
            visible: true,
        }
    }

    /// Interior rectangle: the full rect, shrunk by the border when shown.
    pub fn inner_rect(&self) -> Rect {
        if self.border {
            self.rect.inner()
        } else {
            self.rect
        }
    }

    fn spec_colors(&self, spec: StyleSpec) -> (Rgba, Rgba, Attr) {
        (
            self.fg
                .or(spec.fg)
                .unwrap_or(Rgba::TERMINAL_DEFAULT),
            self.bg
                .or(spec.bg)
                .unwrap_or(Rgba::TERMINAL_DEFAULT),
            spec.attrs,
        )
    }

    /// Paint background, border and title.
    ///
    /// The title lives on the top border row and is clipped to the inner
    /// width; without a border there is nowhere to put it, matching the
    /// reference behaviour.
    pub fn draw_chrome(&self, screen: &mut Screen, ctx: &DrawContext<'_>) {
        let rect = self.rect;
        if rect.is_empty() {
            return;
        }

        let (_, bg, _) = self.spec_colors(ctx.theme.style_or_default(tags::BACKGROUND));
        if !bg.is_terminal_default() {
            screen.background(rect, bg);
        }

        if self.border && rect.width >= 2 && rect.height >= 2 {
            let border_spec = ctx.theme.style_or_default(tags::BORDER);
            let (bfg, bbg, battrs) = self.spec_colors(border_spec);
            screen.border(rect, self.border_style, bfg, bbg, battrs);

            if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
                let tag = if ctx.is_focused(self.id) {
                    tags::HIGHLIGHT
                } else {
                    tags::TITLE
                };
                let spec = ctx.theme.style_or_default(tag);
                let (tfg, tbg, tattrs) = self.spec_colors(spec);
                let clipped =
                    crate::style::truncate_text(title, (rect.width - 2).max(0) as usize, "");
                screen.write(&clipped, rect.x + 1, rect.y, tfg, tbg, tattrs);
            }
        }
    }
}

/// Forward an event to children: mouse events go to the child under the
/// pointer, everything else is offered front to back until consumed.
pub(crate) fn forward_to_children(
    children: &mut [Box<dyn View>],
    event: &Event,
    ctx: &mut EventContext,
) -> bool {
    match event {
        Event::Mouse(mouse) => {
            for child in children.iter_mut() {
                if child.visible() && child.rect().contains(mouse.x, mouse.y) {
                    if child.handle_event(event, ctx) {
                        return true;
                    }
                }
            }
            false
        }
        _ => {
            for child in children.iter_mut() {
                if child.handle_event(event, ctx) {
                    return true;
                }
            }
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

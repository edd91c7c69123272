//! Plain box container.

use crate::event::Event;
use crate::geom::Rect;
use crate::screen::Screen;
use crate::types::{BorderStyle, Rgba};

use super::{forward_to_children, DrawContext, EventContext, Frame, View, ViewId};

/// A box with an optional border and title, drawing its children inside
/// the interior rectangle.
///
/// Children all receive the full interior as their rectangle; a box does
/// not partition space (that's what [`super::GridView`] is for), it
/// decorates it.
pub struct BoxView {
    frame: Frame,
    children: Vec<Box<dyn View>>,
}

impl BoxView {
    pub fn new() -> Self {
        Self {
            frame: Frame::new(),
            children: Vec::new(),
        }
    }

    /// Show or hide the one-cell border.
    pub fn set_border(&mut self, border: bool) {
        self.frame.border = border;
    }

    pub fn set_border_style(&mut self, style: BorderStyle) {
        self.frame.border_style = style;
    }

    /// Title shown on the top border row; invisible without a border.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.frame.title = Some(title.into());
    }

    pub fn set_fg(&mut self, fg: Rgba) {
        self.frame.fg = Some(fg);
    }

    pub fn set_bg(&mut self, bg: Rgba) {
        self.frame.bg = Some(bg);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.frame.visible = visible;
    }

    /// Builder-style border + title.
    pub fn titled(title: impl Into<String>) -> Self {
        let mut view = Self::new();
        view.set_border(true);
        view.set_title(title);
        view
    }

    /// Attach a child, transferring ownership. Returns the child's id.
    pub fn add_child(&mut self, child: impl View + 'static) -> ViewId {
        let id = child.id();
        self.children.push(Box::new(child));
        id
    }

    /// Detach a child by id, dropping it. Ids referencing it go stale.
    pub fn remove_child(&mut self, id: ViewId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.id() != id);
        before != self.children.len()
    }

    /// Interior rectangle available to children.
    pub fn inner_rect(&self) -> Rect {
        self.frame.inner_rect()
    }
}

impl Default for BoxView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for BoxView {
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
        for child in &mut self.children {
            child.set_rect(inner);
            child.layout();
        }
    }

    fn draw(&self, screen: &mut Screen, ctx: &DrawContext<'_>) {
        if !self.frame.visible || self.frame.rect.is_empty() {
            return;
        }
        log::trace!("draw box {:?} rect={:?}", self.frame.id, self.frame.rect);
        self.frame.draw_chrome(screen, ctx);
        for child in &self.children {
            if child.visible() {
                child.draw(screen, ctx);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext) -> bool {
        forward_to_children(&mut self.children, event, ctx)
    }

    fn children(&self) -> &[Box<dyn View>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        &mut self.children
    }
}

//! Grid container.

use crate::event::Event;
use crate::geom::Rect;
use crate::layout::{size_tracks, track_positions, Track};
use crate::screen::Screen;
use crate::types::{BorderStyle, Rgba};

use super::{forward_to_children, DrawContext, EventContext, Frame, View, ViewId};

/// Where a child sits in the grid.
#[derive(Debug, Clone, Copy)]
struct Placement {
    child: usize,
    row: usize,
    col: usize,
    row_span: usize,
    col_span: usize,
    row_weight: i32,
    col_weight: i32,
}

/// Layout container slicing its interior into rows and columns.
///
/// Tracks are declared up front (fixed, weighted or separator) and frozen
/// at the first layout pass; placements may keep arriving and take effect
/// on the next pass. An axis with no declared tracks materializes
/// weight-1 tracks for whatever the placements reference, matching the
/// reference grid.
pub struct GridView {
    frame: Frame,
    rows: Vec<Track>,
    cols: Vec<Track>,
    placements: Vec<Placement>,
    children: Vec<Box<dyn View>>,
    frozen: bool,
}

impl GridView {
    pub fn new() -> Self {
        Self {
            frame: Frame::new(),
            rows: Vec::new(),
            cols: Vec::new(),
            placements: Vec::new(),
            children: Vec::new(),
            frozen: false,
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

    pub fn set_fg(&mut self, fg: Rgba) {
        self.frame.fg = Some(fg);
    }

    pub fn set_bg(&mut self, bg: Rgba) {
        self.frame.bg = Some(bg);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.frame.visible = visible;
    }

    /// Declare the row tracks.
    ///
    /// Panics if called after the first layout pass: the track list is
    /// frozen from then on.
    pub fn set_rows(&mut self, rows: impl IntoIterator<Item = impl Into<Track>>) {
        assert!(
            !self.frozen,
            "grid track list is frozen after the first layout pass"
        );
        self.rows = rows.into_iter().map(Into::into).collect();
    }

    /// Declare the column tracks. Same freezing rule as [`Self::set_rows`].
    pub fn set_columns(&mut self, cols: impl IntoIterator<Item = impl Into<Track>>) {
        assert!(
            !self.frozen,
            "grid track list is frozen after the first layout pass"
        );
        self.cols = cols.into_iter().map(Into::into).collect();
    }

    /// Place a child at (row, col) spanning the given number of tracks.
    pub fn add_item(
        &mut self,
        view: impl View + 'static,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
    ) -> ViewId {
        self.add_item_with_weights(view, row, col, row_span, col_span, 0, 0)
    }

    /// Place a child that additionally contributes weight to the weighted
    /// tracks it spans.
    pub fn add_item_with_weights(
        &mut self,
        view: impl View + 'static,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        row_weight: i32,
        col_weight: i32,
    ) -> ViewId {
        assert!(
            row_span >= 1 && col_span >= 1,
            "grid item at ({row}, {col}) must span at least one track per axis"
        );
        let id = view.id();
        let child = self.children.len();
        self.children.push(Box::new(view));
        self.placements.push(Placement {
            child,
            row,
            col,
            row_span,
            col_span,
            row_weight,
            col_weight,
        });
        if let Some(p) = self.placements.last() {
            self.validate(p);
        }
        id
    }

    /// Interior rectangle available to grid cells.
    pub fn inner_rect(&self) -> Rect {
        self.frame.inner_rect()
    }

    /// Fail fast on a placement referencing tracks a declared axis does
    /// not have.
    fn validate(&self, p: &Placement) {
        if !self.rows.is_empty() {
            assert!(
                p.row + p.row_span <= self.rows.len(),
                "grid item row range {}..{} exceeds the {} declared row tracks",
                p.row,
                p.row + p.row_span,
                self.rows.len()
            );
        }
        if !self.cols.is_empty() {
            assert!(
                p.col + p.col_span <= self.cols.len(),
                "grid item column range {}..{} exceeds the {} declared column tracks",
                p.col,
                p.col + p.col_span,
                self.cols.len()
            );
        }
    }

    /// Tracks for one axis, materializing implicit weight-1 tracks when
    /// none were declared.
    fn axis_tracks(declared: &[Track], extent: usize) -> Vec<Track> {
        if declared.is_empty() {
            vec![Track::weighted(1); extent]
        } else {
            declared.to_vec()
        }
    }

    fn axis_extra_weights(tracks_len: usize, spans: impl Iterator<Item = (usize, usize, i32)>) -> Vec<i32> {
        let mut extra = vec![0i32; tracks_len];
        for (start, span, weight) in spans {
            if weight <= 0 {
                continue;
            }
            for slot in extra.iter_mut().skip(start).take(span) {
                *slot += weight;
            }
        }
        extra
    }
}

impl Default for GridView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for GridView {
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
        self.frozen = true;
        for p in &self.placements {
            self.validate(p);
        }

        let inner = self.frame.inner_rect();

        let row_extent = self
            .placements
            .iter()
            .map(|p| p.row + p.row_span)
            .max()
            .unwrap_or(0);
        let col_extent = self
            .placements
            .iter()
            .map(|p| p.col + p.col_span)
            .max()
            .unwrap_or(0);

        let rows = Self::axis_tracks(&self.rows, row_extent);
        let cols = Self::axis_tracks(&self.cols, col_extent);
        if rows.is_empty() || cols.is_empty() {
            return;
        }

        let row_extra = Self::axis_extra_weights(
            rows.len(),
            self.placements
                .iter()
                .map(|p| (p.row, p.row_span, p.row_weight)),
        );
        let col_extra = Self::axis_extra_weights(
            cols.len(),
            self.placements
                .iter()
                .map(|p| (p.col, p.col_span, p.col_weight)),
        );

        let heights = size_tracks(&rows, &row_extra, inner.height);
        let widths = size_tracks(&cols, &col_extra, inner.width);
        let ys = track_positions(&heights);
        let xs = track_positions(&widths);

        log::trace!(
            "grid {:?} layout rows={heights:?} cols={widths:?}",
            self.frame.id
        );

        for p in &self.placements {
            let x = inner.x + xs[p.col];
            let y = inner.y + ys[p.row];
            let width: i32 = widths[p.col..p.col + p.col_span].iter().sum();
            let height: i32 = heights[p.row..p.row + p.row_span].iter().sum();
            let rect = Rect::new(x, y, width, height).intersection(&inner);
            let child = &mut self.children[p.child];
            child.set_rect(rect);
            child.layout();
        }
    }

    fn draw(&self, screen: &mut Screen, ctx: &DrawContext<'_>) {
        if !self.frame.visible || self.frame.rect.is_empty() {
            return;
        }
        self.frame.draw_chrome(screen, ctx);
        for child in &self.children {
            if child.visible() && !child.rect().is_empty() {
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

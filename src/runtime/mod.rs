//! Single-threaded event loop.
//!
//! One thread owns the view tree, the screen buffer and the theme. The
//! loop blocks on the driver for input, wraps it into a typed [`Event`],
//! routes it (focused view for keys, hit-test for mouse), then runs
//! layout if a handler asked for it, redraws and flushes the diff.
//!
//! Events are strictly FIFO. Synthetic events enqueued from inside a
//! handler are processed before the next driver read; other threads hand
//! events in through [`EventLoop::sender`]. Dispatching the `Done`
//! sentinel tears the loop down; raw mode is released exactly once on
//! every exit path, including error propagation.

mod driver;

pub use driver::{CrosstermDriver, TerminalDriver};

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use thiserror::Error;

use crate::event::{Event, SystemEvent, ViewEvent};
use crate::geom::Rect;
use crate::screen::Screen;
use crate::style::Theme;
use crate::view::{find_view_mut, DrawContext, EventContext, View, ViewId};

const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Errors escaping [`EventLoop::run`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),
}

/// Cloneable handle for producing events from other threads.
///
/// Producers never touch the tree or the screen; they hand events to the
/// loop thread and the loop does the rest.
#[derive(Debug, Clone)]
pub struct EventSender(Sender<Event>);

impl EventSender {
    /// Returns false when the loop is gone.
    pub fn send(&self, event: Event) -> bool {
        self.0.send(event).is_ok()
    }
}

/// Callback observing view-originated events after the tree has seen them.
pub type ViewEventHandler = Box<dyn FnMut(&ViewEvent, &mut EventContext)>;

/// The runtime: driver + screen + theme + one root view.
pub struct EventLoop<D: TerminalDriver> {
    driver: D,
    screen: Screen,
    theme: Theme,
    root: Box<dyn View>,
    focus: Option<ViewId>,
    queue: VecDeque<Event>,
    handoff_rx: Receiver<Event>,
    handoff_tx: Sender<Event>,
    on_view_event: Option<ViewEventHandler>,
}

impl EventLoop<CrosstermDriver> {
    /// Loop over the stock crossterm driver.
    pub fn new(root: impl View + 'static, theme: Theme) -> Self {
        Self::with_driver(root, theme, CrosstermDriver::new())
    }
}

impl<D: TerminalDriver> EventLoop<D> {
    pub fn with_driver(root: impl View + 'static, theme: Theme, driver: D) -> Self {
        let (handoff_tx, handoff_rx) = channel();
        Self {
            driver,
            screen: Screen::new(0, 0),
            theme,
            root: Box::new(root),
            focus: None,
            queue: VecDeque::new(),
            handoff_rx,
            handoff_tx,
            on_view_event: None,
        }
    }

    /// Handle for other threads to enqueue events.
    pub fn sender(&self) -> EventSender {
        EventSender(self.handoff_tx.clone())
    }

    /// Enqueue an event from the loop thread (processed FIFO).
    pub fn enqueue(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Observe view events after the tree has had its chance at them.
    pub fn on_view_event(&mut self, handler: ViewEventHandler) {
        self.on_view_event = Some(handler);
    }

    pub fn set_focus(&mut self, focus: Option<ViewId>) {
        self.focus = focus;
    }

    pub fn focus(&self) -> Option<ViewId> {
        self.focus
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Driver access, mainly for inspecting a test driver after a run.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run until the `Done` sentinel is dispatched or an error escapes.
    ///
    /// Raw mode is acquired before the first draw and released exactly
    /// once whichever way the loop exits.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.driver.acquire()?;
        let result = self.run_inner();
        let released = self.driver.release();
        log::debug!("event loop exited: {result:?}");
        result?;
        released.map_err(Into::into)
    }

    fn run_inner(&mut self) -> Result<(), RuntimeError> {
        let (width, height) = self.driver.size()?;
        self.resize(width, height);
        self.render()?;

        loop {
            let event = self.next_event()?;
            if event.is_done() {
                log::debug!("done event received, tearing down");
                break;
            }
            self.process(event)?;
        }
        Ok(())
    }

    /// Next event in strict arrival order: the synthetic queue first, then
    /// the cross-thread handoff, then the driver.
    fn next_event(&mut self) -> Result<Event, RuntimeError> {
        loop {
            while let Ok(event) = self.handoff_rx.try_recv() {
                self.queue.push_back(event);
            }
            if let Some(event) = self.queue.pop_front() {
                return Ok(event);
            }
            if let Some(event) = self.driver.read_event(POLL_INTERVAL)? {
                return Ok(event);
            }
        }
    }

    fn process(&mut self, event: Event) -> Result<(), RuntimeError> {
        log::trace!("dispatch {event:?}");
        match event {
            Event::System(SystemEvent::Resize(width, height)) => {
                self.resize(width, height);
            }
            Event::System(SystemEvent::Redraw) => {
                self.screen.invalidate();
            }
            _ => self.dispatch(&event),
        }
        self.render()
    }

    /// Route one event into the tree and apply whatever the handlers
    /// asked for (queued events, focus moves, re-layout).
    fn dispatch(&mut self, event: &Event) {
        let mut ctx = EventContext::new();

        let consumed = match event {
            Event::Key(_) => {
                // keys target the focused view; without one the root gets
                // them
                let focused = self
                    .focus
                    .and_then(|id| find_view_mut(self.root.as_mut(), id).map(|_| id));
                if focused.is_none() {
                    // stale id from a detached view; drop it
                    self.focus = None;
                }
                match focused {
                    Some(id) => find_view_mut(self.root.as_mut(), id)
                        .map(|view| view.handle_event(event, &mut ctx))
                        .unwrap_or(false),
                    None => self.root.handle_event(event, &mut ctx),
                }
            }
            _ => self.root.handle_event(event, &mut ctx),
        };
        log::trace!("dispatch consumed={consumed}");

        if let Event::View(view_event) = event {
            if let Some(handler) = self.on_view_event.as_mut() {
                handler(view_event, &mut ctx);
            }
        }

        for queued in ctx.take_queued() {
            self.queue.push_back(queued);
        }
        if let Some(focus) = ctx.take_focus_request() {
            self.focus = Some(focus);
        }
        if ctx.take_layout_request() {
            log::trace!("layout requested by handler");
            self.root.layout();
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        log::debug!("resize to {width}x{height}");
        self.screen.resize(width, height);
        self.root
            .set_rect(Rect::new(0, 0, width as i32, height as i32));
        self.root.layout();
    }

    fn render(&mut self) -> Result<(), RuntimeError> {
        let bounds = self.screen.bounds();
        self.screen.clear(bounds);
        let ctx = DrawContext::with_focus(&self.theme, self.focus);
        self.root.draw(&mut self.screen, &ctx);
        self.screen.diff_and_flush(&mut self.driver)?;
        Ok(())
    }
}

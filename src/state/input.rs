//! Input Module - Terminal event conversion and routing
//!
//! Bridges crossterm's event system with the controller. Terminals report
//! less than a browser does, so two small trackers fill the gaps:
//!
//! - [`ClickCounter`] synthesizes `DoubleClick` from two releases on the same
//!   cell within `double_click_duration`.
//! - [`RegionTracker`] synthesizes `Enter`/`Leave` as the pointer crosses the
//!   container bounds.
//!
//! Events inside the container go to [`Target::Region`]; events outside go to
//! [`Target::Window`], where only an outside press-and-hold listens.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert a crossterm MouseEvent
//! - `TerminalInput::translate` - Expand a crossterm Event into targeted events
//! - `TerminalInput::route` - Translate and dispatch to a controller
//! - `poll_event` - Non-blocking event check with timeout
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_input_position::state::input::{poll_event, TerminalInput};
//! use std::time::Duration;
//!
//! let mut input = TerminalInput::new();
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         input.route(&mut controller, &layout, event);
//!     }
//!     controller.poll();
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    MouseEvent as CrosstermMouseEvent, MouseEventKind as CrosstermMouseEventKind, poll, read,
};
use crossterm::execute;

use super::events::{MouseEvent, MouseEventKind, Target, WindowEvent};
use crate::engine::InteractionController;
use crate::layout::LayoutSource;
use crate::types::{Bounds, Position};

/// Default window for two releases to count as a double-click.
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 500;

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse event. Cell coordinates become viewport
/// coordinates one-to-one.
///
/// Drags are moves; every scroll direction is a wheel event.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let kind = match event.kind {
        CrosstermMouseEventKind::Down(_) => MouseEventKind::Down,
        CrosstermMouseEventKind::Up(_) => MouseEventKind::Up,
        CrosstermMouseEventKind::Drag(_) | CrosstermMouseEventKind::Moved => MouseEventKind::Move,
        CrosstermMouseEventKind::ScrollUp
        | CrosstermMouseEventKind::ScrollDown
        | CrosstermMouseEventKind::ScrollLeft
        | CrosstermMouseEventKind::ScrollRight => MouseEventKind::Wheel,
    };
    MouseEvent::new(kind, event.column as f64, event.row as f64)
}

// =============================================================================
// CLICK COUNTER
// =============================================================================

/// Turns two quick releases on the same spot into a double-click.
#[derive(Debug, Clone)]
pub struct ClickCounter {
    double_click_duration: Duration,
    last_release: Option<(Duration, Position)>,
}

impl ClickCounter {
    pub fn new(double_click_duration: Duration) -> Self {
        Self {
            double_click_duration,
            last_release: None,
        }
    }

    /// Feed an event seen at `now`. Returns the synthesized double-click, if
    /// this release completes one.
    pub fn register(&mut self, now: Duration, event: &MouseEvent) -> Option<MouseEvent> {
        if event.kind != MouseEventKind::Up {
            return None;
        }
        let position = event.position();

        match self.last_release.take() {
            Some((at, last)) if last == position && now.saturating_sub(at) <= self.double_click_duration => {
                Some(MouseEvent::double_click(event.x, event.y))
            }
            _ => {
                self.last_release = Some((now, position));
                None
            }
        }
    }
}

impl Default for ClickCounter {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DOUBLE_CLICK_MS))
    }
}

// =============================================================================
// REGION TRACKER
// =============================================================================

/// Remembers whether the pointer was inside the container.
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    inside: bool,
}

impl RegionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Returns `Enter` or `Leave` when `position` crosses `bounds`.
    pub fn track(&mut self, bounds: &Bounds, position: Position) -> Option<MouseEvent> {
        let inside = bounds.contains(position);
        if inside == self.inside {
            return None;
        }
        self.inside = inside;
        let kind = if inside { MouseEventKind::Enter } else { MouseEventKind::Leave };
        Some(MouseEvent::new(kind, position.x, position.y))
    }
}

// =============================================================================
// TERMINAL INPUT
// =============================================================================

/// One translated event and where it was delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Mouse(Target, MouseEvent),
    Window(WindowEvent),
}

/// Per-terminal translation state.
#[derive(Debug, Clone, Default)]
pub struct TerminalInput {
    clicks: ClickCounter,
    region: RegionTracker,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_double_click_duration(duration: Duration) -> Self {
        Self {
            clicks: ClickCounter::new(duration),
            region: RegionTracker::new(),
        }
    }

    /// Expand one crossterm event into the events a browser would deliver,
    /// in delivery order.
    pub fn translate(&mut self, bounds: &Bounds, now: Duration, event: CrosstermEvent) -> Vec<InputEvent> {
        match event {
            CrosstermEvent::Mouse(mouse) => self.translate_mouse(bounds, now, convert_mouse_event(mouse)),
            CrosstermEvent::Resize(_, _) => vec![InputEvent::Window(WindowEvent::Resize)],
            _ => Vec::new(),
        }
    }

    fn translate_mouse(&mut self, bounds: &Bounds, now: Duration, event: MouseEvent) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(2);
        let crossing = self.region.track(bounds, event.position());

        // Leave is reported before the move that caused it, enter after.
        if let Some(leave) = crossing.filter(|e| e.kind == MouseEventKind::Leave) {
            events.push(InputEvent::Mouse(Target::Region, leave));
        }
        if let Some(enter) = crossing.filter(|e| e.kind == MouseEventKind::Enter) {
            events.push(InputEvent::Mouse(Target::Region, enter));
        }

        let target = if self.region.is_inside() { Target::Region } else { Target::Window };
        events.push(InputEvent::Mouse(target, event));

        if target == Target::Region {
            if let Some(double_click) = self.clicks.register(now, &event) {
                events.push(InputEvent::Mouse(Target::Region, double_click));
            }
        }
        events
    }

    /// Translate `event` against the container's current bounds and dispatch
    /// it. Returns true if any resulting event was handled.
    pub fn route(
        &mut self,
        controller: &mut InteractionController,
        layout: &dyn LayoutSource,
        event: CrosstermEvent,
    ) -> bool {
        let bounds = layout.container_bounds();
        let mut handled = false;
        for input in self.translate(&bounds, controller.now(), event) {
            let response = match input {
                InputEvent::Mouse(target, mouse) => controller.handle_mouse(target, &mouse),
                InputEvent::Window(window) => controller.handle_window(window),
            };
            handled |= response.is_handled();
        }
        handled
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<CrosstermEvent>> {
    if poll(timeout)? { Ok(Some(read()?)) } else { Ok(None) }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

//! Mouse activation strategies
//!
//! One strategy per [`MouseActivation`] mode. A strategy is a zero-sized type
//! implementing [`MouseHandlers`]; [`MouseActivation::handlers`] maps the mode
//! to its strategy so the controller swaps a single `&'static dyn` on switch.
//!
//! Shared rule: while inactive a move only records the passive position;
//! while active it runs a full position update.
//!
//! | Mode | Activates on | Deactivates on |
//! |------|--------------|----------------|
//! | `Click` | release within `click_move_limit` of the press | the next such click |
//! | `DoubleClick` | double-click | the next double-click |
//! | `Hover` | enter, or the first move while inactive | leave |
//! | `MouseDown` | press | release, or leave (unless outside tracking is on) |
//!
//! # Example
//!
//! ```ignore
//! let handlers = MouseActivation::Hover.handlers();
//! assert!(handlers.listens().contains(EventMask::MOUSE_ENTER));
//! let response = handlers.dispatch(&mut interaction, &MouseEvent::enter(10.0, 10.0));
//! ```

use crate::config::MouseActivation;
use crate::engine::interaction::Interaction;
use crate::state::events::{EventMask, MouseEvent, MouseEventKind, Response, Target};
use crate::types::Position;

// =============================================================================
// HANDLER TRAIT
// =============================================================================

/// Event handlers of one mouse activation mode.
///
/// Every handler defaults to doing nothing. `drag_start` defaults to
/// suppressing the native drag.
pub trait MouseHandlers {
    /// The events this mode listens to on the region.
    fn listens(&self) -> EventMask;

    fn mouse_down(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn mouse_up(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn mouse_move(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn mouse_enter(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn mouse_leave(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn double_click(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn wheel(&self, _it: &mut Interaction, _position: Position) -> Response {
        Response::Handled
    }

    fn drag_start(&self, _it: &mut Interaction) -> Response {
        Response::PreventDefault
    }

    /// Route `event` to the matching handler.
    fn dispatch(&self, it: &mut Interaction, event: &MouseEvent) -> Response {
        let position = event.position();
        match event.kind {
            MouseEventKind::Down => self.mouse_down(it, position),
            MouseEventKind::Up => self.mouse_up(it, position),
            MouseEventKind::Move => self.mouse_move(it, position),
            MouseEventKind::Enter => self.mouse_enter(it, position),
            MouseEventKind::Leave => self.mouse_leave(it, position),
            MouseEventKind::DoubleClick => self.double_click(it, position),
            MouseEventKind::Wheel => self.wheel(it, position),
            MouseEventKind::DragStart => self.drag_start(it),
        }
    }
}

impl MouseActivation {
    /// The strategy implementing this mode.
    pub fn handlers(&self) -> &'static dyn MouseHandlers {
        match self {
            Self::Click => &ClickActivation,
            Self::DoubleClick => &DoubleClickActivation,
            Self::Hover => &HoverActivation,
            Self::MouseDown => &MouseDownActivation,
        }
    }
}

/// Passive tracking while inactive, a full update while active.
fn track_move(it: &mut Interaction, position: Position, update_item: bool) {
    if !it.state.active {
        it.set_passive_position(position);
    } else {
        it.set_position(position, update_item, false, false);
    }
}

// =============================================================================
// CLICK
// =============================================================================

/// Toggle on a press-and-release that did not move further than
/// `click_move_limit` (`|dx| + |dy|`).
#[derive(Debug, Clone, Copy)]
pub struct ClickActivation;

impl MouseHandlers for ClickActivation {
    fn listens(&self) -> EventMask {
        EventMask::MOUSE_DOWN
            | EventMask::MOUSE_UP
            | EventMask::MOUSE_MOVE
            | EventMask::MOUSE_LEAVE
            | EventMask::DRAG_START
    }

    fn mouse_down(&self, it: &mut Interaction, position: Position) -> Response {
        it.latch.mouse_down = true;
        it.latch.click_move_start = Some(position);
        Response::Handled
    }

    fn mouse_up(&self, it: &mut Interaction, position: Position) -> Response {
        if !it.latch.mouse_down {
            return Response::Handled;
        }
        it.latch.mouse_down = false;

        let Some(start) = it.latch.click_move_start.take() else {
            return Response::Handled;
        };
        let displacement = (position.x - start.x).abs() + (position.y - start.y).abs();
        if displacement < it.config.click_move_limit {
            it.toggle_active(position);
        }
        Response::Handled
    }

    fn mouse_move(&self, it: &mut Interaction, position: Position) -> Response {
        let dragging = it.latch.mouse_down;
        track_move(it, position, dragging);
        Response::Handled
    }

    fn mouse_leave(&self, it: &mut Interaction, _position: Position) -> Response {
        it.latch.mouse_down = false;
        Response::Handled
    }
}

// =============================================================================
// DOUBLE CLICK
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct DoubleClickActivation;

impl MouseHandlers for DoubleClickActivation {
    fn listens(&self) -> EventMask {
        EventMask::MOUSE_DOWN
            | EventMask::MOUSE_UP
            | EventMask::MOUSE_MOVE
            | EventMask::MOUSE_LEAVE
            | EventMask::DOUBLE_CLICK
            | EventMask::DRAG_START
    }

    fn mouse_down(&self, it: &mut Interaction, _position: Position) -> Response {
        press(it);
        Response::Handled
    }

    fn mouse_up(&self, it: &mut Interaction, _position: Position) -> Response {
        release(it);
        Response::Handled
    }

    fn double_click(&self, it: &mut Interaction, position: Position) -> Response {
        it.toggle_active(position);
        Response::Handled
    }

    fn mouse_move(&self, it: &mut Interaction, position: Position) -> Response {
        if !it.state.active {
            it.set_passive_position(position);
            return Response::Handled;
        }
        drag_after_first_move(it, position);
        Response::Handled
    }

    fn mouse_leave(&self, it: &mut Interaction, _position: Position) -> Response {
        release(it);
        Response::Handled
    }
}

fn press(it: &mut Interaction) {
    it.latch.mouse_down = true;
    it.latch.mouse_just_down = true;
}

fn release(it: &mut Interaction) {
    it.latch.mouse_down = false;
    it.latch.mouse_just_down = false;
}

/// The first move after a press positions without dragging the item.
fn drag_after_first_move(it: &mut Interaction, position: Position) {
    let dragging = it.latch.mouse_down && !it.latch.mouse_just_down;
    it.set_position(position, dragging, false, false);
    it.latch.mouse_just_down = false;
}

// =============================================================================
// HOVER
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct HoverActivation;

impl MouseHandlers for HoverActivation {
    fn listens(&self) -> EventMask {
        EventMask::MOUSE_DOWN
            | EventMask::MOUSE_UP
            | EventMask::MOUSE_MOVE
            | EventMask::MOUSE_ENTER
            | EventMask::MOUSE_LEAVE
            | EventMask::DRAG_START
    }

    fn mouse_down(&self, it: &mut Interaction, _position: Position) -> Response {
        press(it);
        Response::Handled
    }

    fn mouse_up(&self, it: &mut Interaction, _position: Position) -> Response {
        release(it);
        Response::Handled
    }

    fn mouse_move(&self, it: &mut Interaction, position: Position) -> Response {
        if !it.state.active {
            it.activate(position);
            return Response::Handled;
        }
        drag_after_first_move(it, position);
        Response::Handled
    }

    fn mouse_enter(&self, it: &mut Interaction, position: Position) -> Response {
        it.activate(position);
        Response::Handled
    }

    fn mouse_leave(&self, it: &mut Interaction, _position: Position) -> Response {
        it.deactivate();
        release(it);
        Response::Handled
    }
}

// =============================================================================
// MOUSE DOWN (press and hold)
// =============================================================================

/// Active while the button is held.
///
/// With `mouse_down_allow_outside`, leaving the region keeps the press alive
/// by listening for release and movement on the window until the pointer
/// comes back or the button is released.
#[derive(Debug, Clone, Copy)]
pub struct MouseDownActivation;

/// Window listeners held during an outside press.
const OUTSIDE_EVENTS: EventMask = EventMask::MOUSE_UP.union(EventMask::MOUSE_MOVE);

impl MouseDownActivation {
    pub(crate) fn stop_outside_tracking(it: &mut Interaction) {
        it.latch.mouse_outside = false;
        it.listeners.detach(Target::Window, OUTSIDE_EVENTS);
    }
}

impl MouseHandlers for MouseDownActivation {
    fn listens(&self) -> EventMask {
        EventMask::MOUSE_DOWN
            | EventMask::MOUSE_UP
            | EventMask::MOUSE_MOVE
            | EventMask::MOUSE_ENTER
            | EventMask::MOUSE_LEAVE
            | EventMask::WHEEL
            | EventMask::DRAG_START
    }

    fn mouse_down(&self, it: &mut Interaction, position: Position) -> Response {
        it.activate(position);
        Response::Handled
    }

    fn mouse_up(&self, it: &mut Interaction, _position: Position) -> Response {
        it.deactivate();
        if it.latch.mouse_outside {
            Self::stop_outside_tracking(it);
        }
        Response::Handled
    }

    fn mouse_move(&self, it: &mut Interaction, position: Position) -> Response {
        track_move(it, position, true);
        Response::Handled
    }

    fn mouse_enter(&self, it: &mut Interaction, _position: Position) -> Response {
        if it.latch.mouse_outside {
            Self::stop_outside_tracking(it);
        }
        Response::Handled
    }

    fn mouse_leave(&self, it: &mut Interaction, _position: Position) -> Response {
        if !it.state.active {
            return Response::Handled;
        }
        if !it.config.mouse_down_allow_outside {
            it.deactivate();
            return Response::Handled;
        }

        log::debug!("press left the region, tracking on window");
        it.latch.mouse_outside = true;
        it.listeners.attach(Target::Window, OUTSIDE_EVENTS);
        Response::Handled
    }

    fn wheel(&self, it: &mut Interaction, position: Position) -> Response {
        it.set_position(position, false, false, false);
        Response::Handled
    }
}

//! Events - raw pointer input as the controller consumes it
//!
//! Coordinates are viewport (client) coordinates. The host converts whatever
//! its platform delivers into these types; see [`super::input`] for the
//! crossterm conversion.

use crate::types::Position;

// =============================================================================
// EVENT MASK
// =============================================================================

bitflags::bitflags! {
    /// Set of event kinds a listener target is subscribed to.
    ///
    /// Each strategy declares the events it handles; the controller attaches
    /// exactly that set and detaches it again on switch or unmount.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u16 {
        const MOUSE_DOWN = 1 << 0;
        const MOUSE_UP = 1 << 1;
        const MOUSE_MOVE = 1 << 2;
        const MOUSE_ENTER = 1 << 3;
        const MOUSE_LEAVE = 1 << 4;
        const DOUBLE_CLICK = 1 << 5;
        const DRAG_START = 1 << 6;
        const WHEEL = 1 << 7;
        const TOUCH_START = 1 << 8;
        const TOUCH_END = 1 << 9;
        const TOUCH_MOVE = 1 << 10;
        const TOUCH_CANCEL = 1 << 11;
        const RESIZE = 1 << 12;
        const LOAD = 1 << 13;

        const TOUCH = Self::TOUCH_START.bits()
            | Self::TOUCH_END.bits()
            | Self::TOUCH_MOVE.bits()
            | Self::TOUCH_CANCEL.bits();
        const MOUSE = Self::MOUSE_DOWN.bits()
            | Self::MOUSE_UP.bits()
            | Self::MOUSE_MOVE.bits()
            | Self::MOUSE_ENTER.bits()
            | Self::MOUSE_LEAVE.bits()
            | Self::DOUBLE_CLICK.bits()
            | Self::DRAG_START.bits()
            | Self::WHEEL.bits();
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The interactive region itself.
    Region,
    /// The global viewport (resize/load, and mouse events during an outside
    /// press-and-hold).
    Window,
}

// =============================================================================
// MOUSE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down,
    Up,
    Move,
    Enter,
    Leave,
    DoubleClick,
    DragStart,
    Wheel,
}

impl MouseEventKind {
    /// The mask bit for this kind.
    pub fn mask(&self) -> EventMask {
        match self {
            Self::Down => EventMask::MOUSE_DOWN,
            Self::Up => EventMask::MOUSE_UP,
            Self::Move => EventMask::MOUSE_MOVE,
            Self::Enter => EventMask::MOUSE_ENTER,
            Self::Leave => EventMask::MOUSE_LEAVE,
            Self::DoubleClick => EventMask::DOUBLE_CLICK,
            Self::DragStart => EventMask::DRAG_START,
            Self::Wheel => EventMask::WHEEL,
        }
    }
}

/// A mouse event at viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: f64,
    pub y: f64,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(MouseEventKind::Down, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(MouseEventKind::Up, x, y)
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(MouseEventKind::Move, x, y)
    }

    pub fn enter(x: f64, y: f64) -> Self {
        Self::new(MouseEventKind::Enter, x, y)
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self::new(MouseEventKind::Leave, x, y)
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::new(MouseEventKind::DoubleClick, x, y)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

// =============================================================================
// TOUCH
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEventKind {
    Start,
    End,
    Move,
    Cancel,
}

impl TouchEventKind {
    pub fn mask(&self) -> EventMask {
        match self {
            Self::Start => EventMask::TOUCH_START,
            Self::End => EventMask::TOUCH_END,
            Self::Move => EventMask::TOUCH_MOVE,
            Self::Cancel => EventMask::TOUCH_CANCEL,
        }
    }
}

/// A touch event.
///
/// `touches` are the points currently on the surface; `changed_touches` are
/// the points that changed in this event (on `End` these are the lifted ones).
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    pub touches: Vec<Position>,
    pub changed_touches: Vec<Position>,
    /// Whether the host allows suppressing the default action.
    pub cancelable: bool,
}

impl TouchEvent {
    /// Single-point event with the point in both lists.
    pub fn single(kind: TouchEventKind, x: f64, y: f64) -> Self {
        let point = Position::new(x, y);
        Self {
            kind,
            touches: vec![point],
            changed_touches: vec![point],
            cancelable: true,
        }
    }

    pub fn start(x: f64, y: f64) -> Self {
        Self::single(TouchEventKind::Start, x, y)
    }

    /// A lift: the point only appears in `changed_touches`.
    pub fn end(x: f64, y: f64) -> Self {
        Self {
            touches: Vec::new(),
            ..Self::single(TouchEventKind::End, x, y)
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::single(TouchEventKind::Move, x, y)
    }

    pub fn cancel() -> Self {
        Self {
            kind: TouchEventKind::Cancel,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            cancelable: false,
        }
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// First point currently on the surface.
    pub fn first_touch(&self) -> Option<Position> {
        self.touches.first().copied()
    }

    /// First point that changed in this event.
    pub fn first_changed(&self) -> Option<Position> {
        self.changed_touches.first().copied()
    }
}

// =============================================================================
// WINDOW
// =============================================================================

/// Global viewport events that resynchronize geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Resize,
    Load,
}

impl WindowEvent {
    pub fn mask(&self) -> EventMask {
        match self {
            Self::Resize => EventMask::RESIZE,
            Self::Load => EventMask::LOAD,
        }
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// What the host should do after a handler ran.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Response {
    /// No listener was attached for this event.
    #[default]
    Ignored,
    /// Handled; let the native default action proceed.
    Handled,
    /// Handled; the host should call its native prevent-default.
    PreventDefault,
}

impl Response {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::PreventDefault)
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// `PreventDefault` when the event allows it, otherwise `Handled`.
    pub fn prevent_if(cancelable: bool) -> Self {
        if cancelable { Self::PreventDefault } else { Self::Handled }
    }
}

//! State Module - Input-facing state
//!
//! Everything between raw input and the controller:
//!
//! - **Events** - Mouse, touch and window events, event masks, handler responses
//! - **Mouse** - Mouse activation strategies
//! - **Touch** - Touch activation strategies
//! - **Timers** - Clocks and the cancellable timer queue
//! - **Input** - crossterm conversion and routing

pub mod events;
pub mod input;
pub mod mouse;
pub mod timers;
pub mod touch;

pub use events::*;
pub use mouse::{
    ClickActivation, DoubleClickActivation, HoverActivation, MouseDownActivation, MouseHandlers,
};
pub use timers::{Clock, ManualClock, MonotonicClock, TimerId, TimerKind, TimerQueue};
pub use touch::{
    DoubleTapActivation, LongTouchActivation, TapActivation, TouchDownActivation, TouchHandlers,
};

//! # spark-input-position
//!
//! Pointer activation state machine and item positioning engine.
//!
//! A rectangular region becomes "active" through a configurable mouse or touch
//! gesture. While active, the pointer position is tracked and mapped onto a
//! tracked item (an image to pan, a zoom layer, a crosshair), with clamping,
//! centering and drag-style incremental movement.
//!
//! ## Architecture
//!
//! ```text
//! host input → InteractionController → mouse/touch strategy → Interaction
//!                                                                 │
//!                        LayoutSource + ItemRef (geometry) ───────┤
//!                                                                 ▼
//!                                   Projection → Signal / render targets / on_update
//! ```
//!
//! Everything runs on one thread. Timers are entries in a cancellable queue,
//! fired before each dispatched event and on [`InteractionController::poll`].
//!
//! ## Modules
//!
//! - [`types`] - Core data (Position, Dimensions, Bounds, Limits, InteractionState)
//! - [`config`] - Options and activation methods
//! - [`error`] - Configuration errors
//! - [`layout`] - Geometry utilities and layout sources (Taffy bridge)
//! - [`state`] - Events, strategies, timers, crossterm input
//! - [`engine`] - The controller
//! - [`pipeline`] - Output projection

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{InteractionConfig, MouseActivation, TouchActivation};
pub use error::{ConfigError, ConfigResult};

pub use engine::{InputLatch, InteractionController, Listeners};

pub use layout::{
    ItemRef, LayoutSource, SharedLayout, TaffyLayout, align_item_on_position,
    calculate_item_position, center_item_on_position, convert_range, create_adjusted_limits,
    limit_position,
};

pub use pipeline::{RefreshHandle, Snapshot};

pub use state::{
    Clock, EventMask, ManualClock, MonotonicClock, MouseEvent, MouseEventKind, MouseHandlers,
    Response, Target, TouchEvent, TouchEventKind, TouchHandlers, WindowEvent,
};

//! Output Pipeline
//!
//! Every accepted update flows out through the [`Projection`]:
//!
//! ```text
//! Interaction::set_position → Projection::publish → state signal
//!                                                 → render targets (Snapshot)
//!                                                 → on_update callback
//! ```
//!
//! Render targets receive plain data. How a target applies it (translate a
//! child, redraw a canvas, update a terminal cell) is its own business.

mod projection;

pub use projection::{Projection, RefreshHandle, RenderTarget, Snapshot, UpdateCallback};

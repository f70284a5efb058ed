//! Layout Module - Geometry and layout sources
//!
//! Pure geometry (range mapping, clamping, limit adjustment, item placement)
//! plus the sources the controller reads container and item geometry from.
//!
//! # Sources
//!
//! - [`SharedLayout`] - A bounding box the host writes after each layout pass
//! - [`TaffyLayout`] - Reads a node's absolute box from a shared Taffy tree
//! - Any `Fn() -> Bounds` closure
//!
//! The item reports its size through an [`ItemRef`]; an unmounted item is
//! treated as zero-sized.
//!
//! # Example
//!
//! ```ignore
//! use spark_input_position::layout::{create_adjusted_limits, limit_position};
//!
//! let limits = create_adjusted_limits(
//!     Limits::default(),
//!     Dimensions::new(100.0, 100.0),
//!     Dimensions::new(150.0, 150.0),
//!     true,
//!     false,
//! );
//! assert_eq!(limits, Limits::new(-50.0, 0.0, -50.0, 0.0));
//! ```

mod geometry;
mod source;
mod taffy_bridge;

pub use geometry::*;
pub use source::*;
pub use taffy_bridge::{TaffyLayout, node_bounds, node_dimensions, sync_item_ref};

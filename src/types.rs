//! Core types for spark-input-position.
//!
//! These are the plain values that flow from raw pointer coordinates through the
//! controller and out to render targets. Nothing here knows about events,
//! timers or strategies.

use serde::{Deserialize, Serialize};

// =============================================================================
// Position
// =============================================================================

/// A pointer or item coordinate.
///
/// Depending on where it came from this is relative to the viewport (raw event
/// coordinates) or to the container origin (everything stored in
/// [`InteractionState`]). Both axes are always present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Sum of both axes. Used as a cheap one-dimensional movement reference
    /// by the click and long-touch strategies.
    #[inline]
    pub fn axis_sum(&self) -> f64 {
        self.x + self.y
    }
}

// =============================================================================
// Dimensions / Offset
// =============================================================================

/// Width and height of the container or the tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create new dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both axes are zero (an unmounted or collapsed element).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Top-left corner of the container in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

impl Offset {
    /// Create a new offset.
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

// =============================================================================
// Bounds - bounding box as read from layout
// =============================================================================

/// Bounding box of the container in viewport coordinates.
///
/// Layout sources return this fresh on every position update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create new bounds.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The width/height part.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// The left/top part.
    pub fn offset(&self) -> Offset {
        Offset::new(self.left, self.top)
    }

    /// Convert a viewport position into a container-relative one (unclamped).
    pub fn to_local(&self, position: Position) -> Position {
        Position::new(position.x - self.left, position.y - self.top)
    }

    /// Check whether a viewport position lies inside the box.
    ///
    /// Right and bottom edges are exclusive.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.left
            && position.x < self.left + self.width
            && position.y >= self.top
            && position.y < self.top + self.height
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Permissible axis-aligned range for the item position.
///
/// `None` means unbounded on that side. Recomputed on every update from
/// configuration and current geometry, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Limits {
    pub min_x: Option<f64>,
    pub max_x: Option<f64>,
    pub min_y: Option<f64>,
    pub max_y: Option<f64>,
}

impl Limits {
    /// Fully bounded limits.
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x: Some(min_x),
            max_x: Some(max_x),
            min_y: Some(min_y),
            max_y: Some(max_y),
        }
    }

    /// Limits with no bound on any side.
    pub const fn unbounded() -> Self {
        Self {
            min_x: None,
            max_x: None,
            min_y: None,
            max_y: None,
        }
    }

    /// Midpoint of the limits.
    ///
    /// An axis missing either bound (or producing `NaN`) centers at 0.
    pub fn center(&self) -> Position {
        Position::new(
            midpoint(self.min_x, self.max_x),
            midpoint(self.min_y, self.max_y),
        )
    }
}

fn midpoint(min: Option<f64>, max: Option<f64>) -> f64 {
    match (min, max) {
        (Some(min), Some(max)) => {
            let mid = (min + max) / 2.0;
            if mid.is_nan() { 0.0 } else { mid }
        }
        _ => 0.0,
    }
}

// =============================================================================
// InteractionState - the canonical snapshot
// =============================================================================

/// Everything the controller knows about the region and its item.
///
/// Created with all-zero defaults and `active = false`. Only the controller
/// mutates it; consumers receive clones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    /// Whether the region is currently engaged.
    pub active: bool,
    /// Last pointer position while active, clamped to the container.
    pub active_position: Position,
    /// `active_position` from the previous accepted update.
    pub prev_active_position: Position,
    /// Last pointer position while inactive, container-relative and unclamped.
    pub passive_position: Position,
    pub element_dimensions: Dimensions,
    pub element_offset: Offset,
    /// Computed position of the tracked item.
    pub item_position: Position,
    pub item_dimensions: Dimensions,
}

//! Geometry utilities
//!
//! Pure functions behind every position update: range conversion, clamping,
//! limit adjustment and the item placement modes (incremental drag, align,
//! center). No state, no I/O.

use crate::types::{Dimensions, Limits, Position};

// =============================================================================
// RANGES
// =============================================================================

/// Linearly remap `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// A degenerate source range (`old_min == old_max`) yields `NaN`/infinity.
#[inline]
pub fn convert_range(old_min: f64, old_max: f64, new_min: f64, new_max: f64, value: f64) -> f64 {
    let percent = (value - old_min) / (old_max - old_min);
    percent * (new_max - new_min) + new_min
}

/// Clamp each axis of `position` independently.
///
/// Clamps to the min first; only a value not below the min is checked against
/// the max. Unbounded sides pass the value through.
pub fn limit_position(limits: &Limits, position: Position) -> Position {
    Position::new(
        clamp_axis(position.x, limits.min_x, limits.max_x),
        clamp_axis(position.y, limits.min_y, limits.max_y),
    )
}

fn clamp_axis(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    match (min, max) {
        (Some(min), _) if value < min => min,
        (_, Some(max)) if value > max => max,
        _ => value,
    }
}

// =============================================================================
// LIMITS
// =============================================================================

/// Turn configured item bounds into absolute limits for the current geometry.
///
/// 1. A negative max is an offset from the far edge and becomes
///    `element + max`.
/// 2. Without `limit_by_size` that is all.
/// 3. `internal`: the item stays inside the container, `[0, element - item]`.
///    An axis where the item is larger than the container pins max to 0.
/// 4. Otherwise the item must cover the container, `[element - item, 0]`.
///    An axis where the item is smaller than the container pins min to 0.
///    An item with no size at all leaves the limits from step 1.
pub fn create_adjusted_limits(
    configured: Limits,
    element: Dimensions,
    item: Dimensions,
    limit_by_size: bool,
    internal: bool,
) -> Limits {
    let mut limits = configured;

    if let Some(max_x) = limits.max_x.filter(|max| *max < 0.0) {
        limits.max_x = Some(element.width + max_x);
    }
    if let Some(max_y) = limits.max_y.filter(|max| *max < 0.0) {
        limits.max_y = Some(element.height + max_y);
    }

    if !limit_by_size {
        return limits;
    }

    if internal {
        let (max_x, max_y) = (element.width - item.width, element.height - item.height);
        limits.min_x = Some(0.0);
        limits.min_y = Some(0.0);
        limits.max_x = Some(if item.width > element.width { 0.0 } else { max_x });
        limits.max_y = Some(if item.height > element.height { 0.0 } else { max_y });
    } else if !item.is_empty() {
        let (min_x, min_y) = (element.width - item.width, element.height - item.height);
        limits.max_x = Some(0.0);
        limits.max_y = Some(0.0);
        limits.min_x = Some(if item.width < element.width { 0.0 } else { min_x });
        limits.min_y = Some(if item.height < element.height { 0.0 } else { min_y });
    }

    limits
}

// =============================================================================
// ITEM PLACEMENT
// =============================================================================

/// Incremental drag: move the item by the active position delta times
/// `multiplier`.
pub fn calculate_item_position(
    item_position: Position,
    prev_active_position: Position,
    active_position: Position,
    multiplier: f64,
) -> Position {
    Position::new(
        item_position.x + (active_position.x - prev_active_position.x) * multiplier,
        item_position.y + (active_position.y - prev_active_position.y) * multiplier,
    )
}

/// Map the cursor onto the item's travel range so the same relative point of
/// the item sits under the cursor.
///
/// A zero-sized item has no travel range and lands on the raw position.
pub fn align_item_on_position(element: Dimensions, item: Dimensions, position: Position) -> Position {
    Position::new(
        convert_range(0.0, element.width, 0.0, element.width - item.width, position.x),
        convert_range(0.0, element.height, 0.0, element.height - item.height, position.y),
    )
}

/// Like [`align_item_on_position`], then shift so the item point under the
/// cursor ends up in the middle of the container.
pub fn center_item_on_position(element: Dimensions, item: Dimensions, position: Position) -> Position {
    let aligned = align_item_on_position(element, item, position);
    Position::new(
        aligned.x + element.width / 2.0 - position.x,
        aligned.y + element.height / 2.0 - position.y,
    )
}

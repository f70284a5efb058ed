//! Layout sources - where container and item geometry comes from.
//!
//! The controller never caches geometry across updates: every accepted
//! position update asks its [`LayoutSource`] for the container's current
//! bounding box and reads the [`ItemRef`] for the item's current size.

use std::cell::Cell;
use std::rc::Rc;

use crate::types::{Bounds, Dimensions};

// =============================================================================
// LAYOUT SOURCE
// =============================================================================

/// Supplies the container's bounding box in viewport coordinates.
pub trait LayoutSource {
    fn container_bounds(&self) -> Bounds;
}

impl<F> LayoutSource for F
where
    F: Fn() -> Bounds,
{
    fn container_bounds(&self) -> Bounds {
        self()
    }
}

// =============================================================================
// SHARED LAYOUT
// =============================================================================

/// A host-updated bounding box.
///
/// Clones share the same cell, so the host keeps one handle and writes new
/// bounds after each layout pass while the controller holds another.
#[derive(Debug, Clone, Default)]
pub struct SharedLayout {
    bounds: Rc<Cell<Bounds>>,
}

impl SharedLayout {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds: Rc::new(Cell::new(bounds)),
        }
    }

    /// Replace the bounds. Takes effect on the next position update.
    pub fn set(&self, bounds: Bounds) {
        self.bounds.set(bounds);
    }

    pub fn get(&self) -> Bounds {
        self.bounds.get()
    }
}

impl LayoutSource for SharedLayout {
    fn container_bounds(&self) -> Bounds {
        self.get()
    }
}

// =============================================================================
// ITEM REF
// =============================================================================

/// Handle through which the tracked item reports its size.
///
/// Handed to render targets in every snapshot. An unmounted item reports
/// nothing and is treated as zero-sized by the geometry code.
#[derive(Debug, Clone, Default)]
pub struct ItemRef {
    dimensions: Rc<Cell<Option<Dimensions>>>,
}

impl ItemRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the item's current size.
    pub fn mount(&self, dimensions: Dimensions) {
        self.dimensions.set(Some(dimensions));
    }

    pub fn unmount(&self) {
        self.dimensions.set(None);
    }

    pub fn is_mounted(&self) -> bool {
        self.dimensions.get().is_some()
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions.get()
    }

    /// True when both handles point at the same item.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.dimensions, &other.dimensions)
    }
}

//! Taffy Bridge - Read container and item geometry from a Taffy tree
//!
//! Taffy stores each node's location relative to its parent. Position updates
//! need viewport coordinates, so [`TaffyLayout`] walks the parent chain and
//! sums locations on every read. Layout must already have been computed
//! (`TaffyTree::compute_layout`) by the host.

use std::cell::RefCell;
use std::rc::Rc;

use taffy::{NodeId, TaffyTree};

use crate::types::{Bounds, Dimensions, Offset};

use super::source::{ItemRef, LayoutSource};

// =============================================================================
// TAFFY LAYOUT
// =============================================================================

/// A [`LayoutSource`] backed by one node of a shared Taffy tree.
pub struct TaffyLayout<T = ()> {
    tree: Rc<RefCell<TaffyTree<T>>>,
    node: NodeId,
    /// Viewport position of the tree's root.
    origin: Offset,
}

impl<T> TaffyLayout<T> {
    pub fn new(tree: Rc<RefCell<TaffyTree<T>>>, node: NodeId) -> Self {
        Self {
            tree,
            node,
            origin: Offset::default(),
        }
    }

    /// Place the tree's root somewhere other than the viewport origin.
    pub fn with_origin(mut self, origin: Offset) -> Self {
        self.origin = origin;
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl<T> LayoutSource for TaffyLayout<T> {
    fn container_bounds(&self) -> Bounds {
        let tree = self.tree.borrow();
        node_bounds(&tree, self.node, self.origin).unwrap_or_else(|| {
            log::warn!("taffy node {:?} has no layout, using empty bounds", self.node);
            Bounds::default()
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Absolute bounds of `node`, or `None` if the node is not in the tree.
pub fn node_bounds<T>(tree: &TaffyTree<T>, node: NodeId, origin: Offset) -> Option<Bounds> {
    let layout = tree.layout(node).ok()?;
    let mut left = origin.left + layout.location.x as f64;
    let mut top = origin.top + layout.location.y as f64;

    let mut current = tree.parent(node);
    while let Some(parent) = current {
        if let Ok(parent_layout) = tree.layout(parent) {
            left += parent_layout.location.x as f64;
            top += parent_layout.location.y as f64;
        }
        current = tree.parent(parent);
    }

    Some(Bounds::new(
        left,
        top,
        layout.size.width as f64,
        layout.size.height as f64,
    ))
}

/// Computed size of `node`.
pub fn node_dimensions<T>(tree: &TaffyTree<T>, node: NodeId) -> Option<Dimensions> {
    let layout = tree.layout(node).ok()?;
    Some(Dimensions::new(layout.size.width as f64, layout.size.height as f64))
}

/// Report a Taffy node's computed size through an [`ItemRef`].
///
/// Unmounts the item if the node has no layout.
pub fn sync_item_ref<T>(item: &ItemRef, tree: &TaffyTree<T>, node: NodeId) {
    match node_dimensions(tree, node) {
        Some(dimensions) => item.mount(dimensions),
        None => item.unmount(),
    }
}

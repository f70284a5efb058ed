//! Output projection - pushing state to render targets
//!
//! After every accepted update the controller publishes the new
//! [`InteractionState`] three ways:
//!
//! 1. A `spark_signals` signal, for consumers that derive from it reactively.
//! 2. Each registered render target, which receives a [`Snapshot`] carrying
//!    the state plus the item ref and the refresh handle.
//! 3. The `on_update` callback, if one is set.
//!
//! Anything that is not registered as a target is simply not touched.
//!
//! # Example
//!
//! ```ignore
//! let cleanup = controller.attach_target(|snapshot| {
//!     let p = snapshot.state.item_position;
//!     zoom_layer.translate(p.x, p.y);
//! });
//!
//! // Later
//! cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::layout::ItemRef;
use crate::types::InteractionState;

// =============================================================================
// SNAPSHOT
// =============================================================================

/// What a render target receives.
pub struct Snapshot<'a> {
    pub state: &'a InteractionState,
    /// The item reports its size through this.
    pub item_ref: &'a ItemRef,
    /// Ask the controller to re-read geometry (for example once an image has
    /// loaded and its size is known).
    pub refresh: &'a RefreshHandle,
}

/// Shared flag a child raises to request a geometry refresh.
///
/// The controller honours the request on its next poll or dispatch.
#[derive(Debug, Clone, Default)]
pub struct RefreshHandle {
    requested: Rc<Cell<bool>>,
}

impl RefreshHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Clear the flag, returning whether it was set.
    pub(crate) fn take(&self) -> bool {
        self.requested.replace(false)
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// A render target callback.
pub type RenderTarget = Box<dyn FnMut(&Snapshot<'_>)>;

/// Callback invoked with the full state after every accepted update.
pub type UpdateCallback = Box<dyn FnMut(&InteractionState)>;

struct TargetRegistry {
    targets: Vec<(usize, RenderTarget)>,
    next_id: usize,
}

impl TargetRegistry {
    fn new() -> Self {
        Self {
            targets: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Fan-out of state updates.
pub struct Projection {
    signal: Signal<InteractionState>,
    registry: Rc<RefCell<TargetRegistry>>,
    on_update: Option<UpdateCallback>,
    item_ref: ItemRef,
    refresh: RefreshHandle,
}

impl Projection {
    pub fn new(item_ref: ItemRef) -> Self {
        Self {
            signal: signal(InteractionState::default()),
            registry: Rc::new(RefCell::new(TargetRegistry::new())),
            on_update: None,
            item_ref,
            refresh: RefreshHandle::new(),
        }
    }

    /// The reactive state signal.
    pub fn signal(&self) -> Signal<InteractionState> {
        self.signal.clone()
    }

    pub fn item_ref(&self) -> &ItemRef {
        &self.item_ref
    }

    pub fn refresh_handle(&self) -> &RefreshHandle {
        &self.refresh
    }

    pub fn set_on_update(&mut self, callback: Option<UpdateCallback>) {
        self.on_update = callback;
    }

    /// Register a render target. Returns cleanup function.
    ///
    /// Must not be called from inside a target while it is being notified.
    pub fn attach<F>(&self, target: F) -> impl FnOnce() + use<F>
    where
        F: FnMut(&Snapshot<'_>) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id();
            registry.targets.push((id, Box::new(target)));
            id
        };

        let registry = Rc::downgrade(&self.registry);
        move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .borrow_mut()
                    .targets
                    .retain(|(target_id, _)| *target_id != id);
            }
        }
    }

    pub fn target_count(&self) -> usize {
        self.registry.borrow().targets.len()
    }

    /// Push `state` to the signal, every target and the update callback.
    pub fn publish(&mut self, state: &InteractionState) {
        self.signal.set(state.clone());

        let snapshot = Snapshot {
            state,
            item_ref: &self.item_ref,
            refresh: &self.refresh,
        };
        for (_, target) in self.registry.borrow_mut().targets.iter_mut() {
            target(&snapshot);
        }

        if let Some(on_update) = self.on_update.as_mut() {
            on_update(state);
        }
    }
}

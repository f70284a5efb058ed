//! Listener registry
//!
//! Tracks which event kinds are attached on each [`Target`]. The host binds
//! native listeners from this (see [`Listeners::attached`]); the controller
//! uses it to drop events nobody is listening to, which makes a detach
//! observable even when the host keeps delivering.

use crate::state::events::{EventMask, Target};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listeners {
    region: EventMask,
    window: EventMask,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, target: Target) -> &mut EventMask {
        match target {
            Target::Region => &mut self.region,
            Target::Window => &mut self.window,
        }
    }

    pub fn attach(&mut self, target: Target, mask: EventMask) {
        log::debug!("attach {:?} listeners: {:?}", target, mask);
        self.slot(target).insert(mask);
    }

    pub fn detach(&mut self, target: Target, mask: EventMask) {
        log::debug!("detach {:?} listeners: {:?}", target, mask);
        self.slot(target).remove(mask);
    }

    /// Everything currently attached on `target`.
    pub fn attached(&self, target: Target) -> EventMask {
        match target {
            Target::Region => self.region,
            Target::Window => self.window,
        }
    }

    pub fn is_attached(&self, target: Target, mask: EventMask) -> bool {
        self.attached(target).contains(mask)
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty() && self.window.is_empty()
    }

    pub fn clear(&mut self) {
        log::debug!("detach all listeners");
        self.region = EventMask::empty();
        self.window = EventMask::empty();
    }
}

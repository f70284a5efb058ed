//! Interaction core - the state every strategy works on
//!
//! [`Interaction`] owns the canonical [`InteractionState`], the per-region
//! [`InputLatch`], the timer queue and the listener registry. Mouse and touch
//! strategies receive `&mut Interaction` and drive it through the operations
//! below; nothing else mutates the state.
//!
//! # Position updates
//!
//! [`Interaction::set_position`] is the single full update pass:
//!
//! 1. Throttle: with a minimum update interval configured, an update arriving
//!    before the refresh cooldown elapsed is dropped.
//! 2. Re-read container and item geometry.
//! 3. Clamp the pointer into the container to get `active_position`.
//! 4. Resolve `item_position` by priority: explicit centering, linking,
//!    aligning, centering on the cursor, incremental drag. The result is
//!    clamped to the adjusted limits. With no applicable rule the item stays
//!    where it was.
//! 5. Publish and arm the refresh cooldown.

use std::rc::Rc;

use crate::config::InteractionConfig;
use crate::engine::listeners::Listeners;
use crate::layout::{
    ItemRef, LayoutSource, align_item_on_position, calculate_item_position,
    center_item_on_position, create_adjusted_limits, limit_position,
};
use crate::pipeline::Projection;
use crate::state::timers::{Clock, TimerId, TimerKind, TimerQueue};
use crate::types::{Dimensions, InteractionState, Limits, Position};

// =============================================================================
// INPUT LATCH
// =============================================================================

/// Per-region flags and pending timers of the active strategies.
///
/// Owned by one controller, never shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputLatch {
    /// A button is held inside the region.
    pub mouse_down: bool,
    /// The press that just happened has not seen a move yet.
    pub mouse_just_down: bool,
    /// A press-and-hold left the region with outside tracking enabled.
    pub mouse_outside: bool,
    /// Pointer position at button down, for click-vs-drag.
    pub click_move_start: Option<Position>,

    pub touched: bool,
    pub just_touched: bool,
    /// A first tap completed, waiting for the second.
    pub tapped: bool,
    pub tap_timed_out: bool,
    pub double_tap_timed_out: bool,
    /// Axis sum of the touch at start, for long-touch movement tolerance.
    pub long_touch_start: f64,

    pub tap_timer: Option<TimerId>,
    pub double_tap_timer: Option<TimerId>,
    pub long_touch_timer: Option<TimerId>,
}

impl InputLatch {
    pub fn reset_mouse(&mut self) {
        self.mouse_down = false;
        self.mouse_just_down = false;
        self.mouse_outside = false;
        self.click_move_start = None;
    }

    /// Clear touch flags. Timers are left to the caller to cancel.
    pub fn reset_touch_flags(&mut self) {
        self.touched = false;
        self.just_touched = false;
        self.tapped = false;
        self.tap_timed_out = false;
        self.double_tap_timed_out = false;
        self.long_touch_start = 0.0;
    }

    pub fn has_touch_timers(&self) -> bool {
        self.tap_timer.is_some() || self.double_tap_timer.is_some() || self.long_touch_timer.is_some()
    }
}

// =============================================================================
// INTERACTION
// =============================================================================

pub struct Interaction {
    pub(crate) config: InteractionConfig,
    pub(crate) state: InteractionState,
    pub(crate) latch: InputLatch,
    pub(crate) timers: TimerQueue,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) layout: Box<dyn LayoutSource>,
    pub(crate) listeners: Listeners,
    pub(crate) projection: Projection,
    /// Whether the next position update is accepted.
    pub(crate) refresh: bool,
    refresh_timer: Option<TimerId>,
}

impl Interaction {
    pub fn new(config: InteractionConfig, layout: Box<dyn LayoutSource>, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            state: InteractionState::default(),
            latch: InputLatch::default(),
            timers: TimerQueue::new(),
            clock,
            layout,
            listeners: Listeners::new(),
            projection: Projection::new(ItemRef::new()),
            refresh: true,
            refresh_timer: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn latch(&self) -> &InputLatch {
        &self.latch
    }

    pub fn item_ref(&self) -> &ItemRef {
        self.projection.item_ref()
    }

    fn configured_limits(&self) -> Limits {
        Limits {
            min_x: self.config.item_position_min_x,
            max_x: self.config.item_position_max_x,
            min_y: self.config.item_position_min_y,
            max_y: self.config.item_position_max_y,
        }
    }

    // -------------------------------------------------------------------------
    // Position updates
    // -------------------------------------------------------------------------

    /// Full update pass at viewport position `position`.
    ///
    /// Returns false if the update was dropped by the throttle.
    pub fn set_position(
        &mut self,
        position: Position,
        update_item: bool,
        activate: bool,
        center_item: bool,
    ) -> bool {
        if self.config.min_update_interval().is_some() && !self.refresh {
            log::trace!("position update dropped by throttle");
            return false;
        }

        let bounds = self.layout.container_bounds();
        let element = bounds.dimensions();
        let local = bounds.to_local(position);
        let active_position = Position::new(
            local.x.max(0.0).min(element.width),
            local.y.max(0.0).min(element.height),
        );

        let previous_active = self.state.active_position;
        let previous_item = self.state.item_position;

        self.state.element_dimensions = element;
        self.state.element_offset = bounds.offset();
        self.state.active_position = active_position;
        if activate {
            self.state.active = true;
        }

        let item = self.item_ref().dimensions();
        if let Some(dimensions) = item {
            self.state.item_dimensions = dimensions;
        }
        if self.config.tracks_previous() {
            self.state.prev_active_position = previous_active;
        }
        if self.config.track_passive_position {
            self.state.passive_position = local;
        }

        let limits = create_adjusted_limits(
            self.configured_limits(),
            element,
            item.unwrap_or(Dimensions::ZERO),
            self.config.item_position_limit_by_size,
            self.config.item_position_limit_internal,
        );

        if center_item || (activate && self.config.center_item_on_activate) {
            self.state.item_position = limits.center();
        } else if let Some(resolved) =
            self.resolve_item_position(element, item, active_position, previous_active, previous_item, update_item, activate)
        {
            self.state.item_position = limit_position(&limits, resolved);
        }

        self.publish();
        self.start_refresh_timer();
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_item_position(
        &self,
        element: Dimensions,
        item: Option<Dimensions>,
        active_position: Position,
        previous_active: Position,
        previous_item: Position,
        update_item: bool,
        activate: bool,
    ) -> Option<Position> {
        let config = &self.config;
        if !config.track_item_position {
            return None;
        }

        let item = item.unwrap_or(Dimensions::ZERO);
        if config.link_item_to_active {
            Some(active_position)
        } else if config.align_item_on_active_pos {
            Some(align_item_on_position(element, item, active_position))
        } else if activate && config.center_item_on_activate_pos {
            Some(center_item_on_position(element, item, active_position))
        } else if update_item {
            Some(calculate_item_position(
                previous_item,
                previous_active,
                active_position,
                config.item_movement_multiplier,
            ))
        } else {
            None
        }
    }

    /// Record the pointer while inactive. Not throttled.
    pub fn set_passive_position(&mut self, position: Position) {
        if !self.config.track_passive_position {
            return;
        }
        let bounds = self.layout.container_bounds();
        self.state.passive_position = bounds.to_local(position);
        self.publish();
    }

    pub fn activate(&mut self, position: Position) {
        log::debug!("activate at ({}, {})", position.x, position.y);
        self.set_position(position, false, true, false);
    }

    pub fn deactivate(&mut self) {
        log::debug!("deactivate");
        self.state.active = false;
        self.publish();
    }

    pub fn toggle_active(&mut self, position: Position) {
        if self.state.active {
            self.deactivate();
        } else {
            self.activate(position);
        }
    }

    /// Resynchronize geometry after mount, resize or load.
    pub fn refresh_position(&mut self) {
        self.set_position(
            Position::ZERO,
            self.config.track_item_position,
            false,
            self.config.center_item_on_load,
        );
    }

    fn publish(&mut self) {
        self.projection.publish(&self.state);
    }

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------

    /// Arm the cooldown after an accepted update. Without a minimum interval
    /// nothing is armed and updates stay open.
    fn start_refresh_timer(&mut self) {
        let Some(interval) = self.config.min_update_interval() else {
            return;
        };
        if let Some(id) = self.refresh_timer.take() {
            self.timers.cancel(id);
        }
        self.refresh = false;
        let deadline = self.clock.now() + interval;
        self.refresh_timer = Some(self.timers.schedule(TimerKind::RefreshCooldown, deadline));
    }

    /// Drop a running cooldown so the next update is accepted.
    pub(crate) fn reset_refresh_cooldown(&mut self) {
        if let Some(id) = self.refresh_timer.take() {
            self.timers.cancel(id);
        }
        self.refresh = true;
    }

    pub(crate) fn start_tap_timer(&mut self) {
        self.cancel_timer_slot(TimerSlot::Tap);
        let deadline = self.clock.now() + self.config.tap_duration();
        self.latch.tap_timer = Some(self.timers.schedule(TimerKind::Tap, deadline));
    }

    pub(crate) fn start_double_tap_timer(&mut self) {
        self.cancel_timer_slot(TimerSlot::DoubleTap);
        let deadline = self.clock.now() + self.config.double_tap_duration();
        self.latch.double_tap_timer = Some(self.timers.schedule(TimerKind::DoubleTap, deadline));
    }

    pub(crate) fn start_long_touch_timer(&mut self, position: Position) {
        self.cancel_timer_slot(TimerSlot::LongTouch);
        let deadline = self.clock.now() + self.config.long_touch_duration();
        self.latch.long_touch_timer = Some(self.timers.schedule(TimerKind::LongTouch { position }, deadline));
    }

    pub(crate) fn cancel_timer_slot(&mut self, slot: TimerSlot) {
        let id = match slot {
            TimerSlot::Tap => self.latch.tap_timer.take(),
            TimerSlot::DoubleTap => self.latch.double_tap_timer.take(),
            TimerSlot::LongTouch => self.latch.long_touch_timer.take(),
        };
        if let Some(id) = id {
            self.timers.cancel(id);
        }
    }

    /// Cancel every touch timer and clear touch flags.
    pub(crate) fn reset_touch(&mut self) {
        self.cancel_timer_slot(TimerSlot::Tap);
        self.cancel_timer_slot(TimerSlot::DoubleTap);
        self.cancel_timer_slot(TimerSlot::LongTouch);
        self.latch.reset_touch_flags();
    }

    /// Fire every timer due at the current clock time.
    pub fn fire_due_timers(&mut self) {
        let now = self.clock.now();
        while let Some((id, kind)) = self.timers.pop_due(now) {
            self.fire_timer(id, kind);
        }
    }

    fn fire_timer(&mut self, id: TimerId, kind: TimerKind) {
        log::trace!("timer {:?} fired: {:?}", id, kind);
        match kind {
            TimerKind::Tap => {
                self.latch.tap_timer = None;
                self.latch.tap_timed_out = true;
            }
            TimerKind::DoubleTap => {
                self.latch.double_tap_timer = None;
                self.latch.double_tap_timed_out = true;
            }
            TimerKind::LongTouch { position } => {
                self.latch.long_touch_timer = None;
                if self.latch.touched {
                    self.toggle_active(position);
                }
            }
            TimerKind::RefreshCooldown => {
                self.refresh_timer = None;
                self.refresh = true;
            }
        }
    }

    /// Disarm everything, including the refresh cooldown.
    pub(crate) fn clear_timers(&mut self) {
        self.timers.clear();
        self.latch.tap_timer = None;
        self.latch.double_tap_timer = None;
        self.latch.long_touch_timer = None;
        self.refresh_timer = None;
        self.refresh = true;
    }
}

/// Which latch timer to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerSlot {
    Tap,
    DoubleTap,
    LongTouch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SharedLayout;
    use crate::state::timers::ManualClock;
    use crate::types::Bounds;

    fn interaction(config: InteractionConfig, bounds: Bounds) -> (Interaction, ManualClock) {
        let clock = ManualClock::new();
        let interaction = Interaction::new(config, Box::new(SharedLayout::new(bounds)), Rc::new(clock.clone()));
        (interaction, clock)
    }

    fn unthrottled() -> InteractionConfig {
        InteractionConfig {
            min_update_speed_in_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_active_position_is_clamped_to_container() {
        let (mut it, _) = interaction(unthrottled(), Bounds::new(10.0, 20.0, 100.0, 50.0));

        it.activate(Position::new(500.0, 0.0));

        assert!(it.state().active);
        assert_eq!(it.state().active_position, Position::new(100.0, 0.0));
        assert_eq!(it.state().element_dimensions, Dimensions::new(100.0, 50.0));
        assert_eq!(it.state().element_offset.left, 10.0);
    }

    #[test]
    fn test_center_on_activate_pos() {
        let config = InteractionConfig {
            track_item_position: true,
            center_item_on_activate_pos: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 400.0, 400.0));

        it.activate(Position::new(0.0, 0.0));

        assert_eq!(it.state().item_position, Position::new(200.0, 200.0));
    }

    #[test]
    fn test_item_untouched_without_tracking() {
        let config = InteractionConfig {
            link_item_to_active: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 100.0, 100.0));
        it.state.item_position = Position::new(7.0, 7.0);

        it.set_position(Position::new(50.0, 50.0), true, false, false);

        assert_eq!(it.state().item_position, Position::new(7.0, 7.0));
    }

    #[test]
    fn test_linked_item_is_clamped() {
        let config = InteractionConfig {
            track_item_position: true,
            link_item_to_active: true,
            item_position_max_x: Some(30.0),
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.set_position(Position::new(50.0, 60.0), false, false, false);

        assert_eq!(it.state().item_position, Position::new(30.0, 60.0));
    }

    #[test]
    fn test_drag_moves_item_by_delta() {
        let config = InteractionConfig {
            track_item_position: true,
            item_movement_multiplier: 2.0,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.set_position(Position::new(10.0, 10.0), false, false, false);
        it.set_position(Position::new(15.0, 12.0), true, false, false);

        assert_eq!(it.state().prev_active_position, Position::new(10.0, 10.0));
        assert_eq!(it.state().item_position, Position::new(10.0, 4.0));
    }

    #[test]
    fn test_throttle_drops_until_cooldown_fires() {
        let (mut it, clock) = interaction(InteractionConfig::default(), Bounds::new(0.0, 0.0, 100.0, 100.0));

        assert!(it.set_position(Position::new(10.0, 10.0), false, false, false));
        assert!(!it.set_position(Position::new(20.0, 20.0), false, false, false));
        assert_eq!(it.state().active_position, Position::new(10.0, 10.0));

        clock.advance_ms(1);
        it.fire_due_timers();
        assert!(it.set_position(Position::new(20.0, 20.0), false, false, false));
        assert_eq!(it.state().active_position, Position::new(20.0, 20.0));
    }

    #[test]
    fn test_unthrottled_updates_leave_refresh_open() {
        let (mut it, _) = interaction(unthrottled(), Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.set_position(Position::new(10.0, 10.0), false, false, false);

        assert!(it.refresh);
        it.config.min_update_speed_in_ms = 16;
        assert!(it.set_position(Position::new(20.0, 20.0), false, false, false));
        assert!(!it.refresh);
    }

    #[test]
    fn test_clear_timers_reopens_throttle() {
        let (mut it, _) = interaction(InteractionConfig::default(), Bounds::new(0.0, 0.0, 100.0, 100.0));
        it.set_position(Position::new(10.0, 10.0), false, false, false);
        assert!(!it.refresh);

        it.clear_timers();

        assert!(it.timers.is_empty());
        assert!(it.set_position(Position::new(20.0, 20.0), false, false, false));
    }

    #[test]
    fn test_align_maps_pointer_onto_item_range() {
        let config = InteractionConfig {
            track_item_position: true,
            align_item_on_active_pos: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 200.0, 200.0));
        it.item_ref().mount(Dimensions::new(400.0, 400.0));

        it.set_position(Position::new(100.0, 100.0), false, false, false);

        assert_eq!(it.state().item_position, Position::new(-100.0, -100.0));
    }

    #[test]
    fn test_link_takes_priority_over_align() {
        let config = InteractionConfig {
            track_item_position: true,
            link_item_to_active: true,
            align_item_on_active_pos: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 200.0, 200.0));
        it.item_ref().mount(Dimensions::new(400.0, 400.0));

        it.set_position(Position::new(100.0, 100.0), false, false, false);

        assert_eq!(it.state().item_position, Position::new(100.0, 100.0));
    }

    #[test]
    fn test_previous_position_tracked_without_item_tracking() {
        let config = InteractionConfig {
            track_previous_position: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.set_position(Position::new(10.0, 20.0), true, false, false);
        it.set_position(Position::new(30.0, 40.0), true, false, false);

        assert_eq!(it.state().prev_active_position, Position::new(10.0, 20.0));
        assert_eq!(it.state().item_position, Position::ZERO);
    }

    #[test]
    fn test_previous_position_untracked_by_default() {
        let (mut it, _) = interaction(unthrottled(), Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.set_position(Position::new(10.0, 20.0), false, false, false);
        it.set_position(Position::new(30.0, 40.0), false, false, false);

        assert_eq!(it.state().prev_active_position, Position::ZERO);
    }

    #[test]
    fn test_passive_position_is_unclamped_and_skips_throttle() {
        let config = InteractionConfig {
            track_passive_position: true,
            ..Default::default()
        };
        let (mut it, _) = interaction(config, Bounds::new(10.0, 10.0, 100.0, 100.0));

        it.set_position(Position::new(20.0, 20.0), false, false, false);
        it.set_passive_position(Position::new(0.0, 300.0));

        assert_eq!(it.state().passive_position, Position::new(-10.0, 290.0));
    }

    #[test]
    fn test_center_on_load_uses_limits_midpoint() {
        let config = InteractionConfig {
            track_item_position: true,
            center_item_on_load: true,
            item_position_limit_by_size: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 200.0, 100.0));
        it.item_ref().mount(Dimensions::new(600.0, 300.0));

        it.refresh_position();

        assert_eq!(it.state().item_dimensions, Dimensions::new(600.0, 300.0));
        assert_eq!(it.state().item_position, Position::new(-200.0, -100.0));
    }

    #[test]
    fn test_center_with_unbounded_limits_is_origin() {
        let config = InteractionConfig {
            center_item_on_activate: true,
            ..unthrottled()
        };
        let (mut it, _) = interaction(config, Bounds::new(0.0, 0.0, 100.0, 100.0));
        it.state.item_position = Position::new(5.0, 5.0);

        it.activate(Position::new(50.0, 50.0));

        assert_eq!(it.state().item_position, Position::ZERO);
    }

    #[test]
    fn test_long_touch_timer_toggles_only_while_touched() {
        let (mut it, clock) = interaction(unthrottled(), Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.latch.touched = true;
        it.start_long_touch_timer(Position::new(5.0, 5.0));
        clock.advance_ms(500);
        it.fire_due_timers();
        assert!(it.state().active);
        assert_eq!(it.latch().long_touch_timer, None);

        it.latch.touched = false;
        it.start_long_touch_timer(Position::new(5.0, 5.0));
        clock.advance_ms(500);
        it.fire_due_timers();
        assert!(it.state().active);
    }

    #[test]
    fn test_reset_touch_cancels_all_timers() {
        let (mut it, clock) = interaction(unthrottled(), Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.start_tap_timer();
        it.start_double_tap_timer();
        it.start_long_touch_timer(Position::ZERO);
        assert!(it.latch().has_touch_timers());

        it.reset_touch();
        assert!(!it.latch().has_touch_timers());
        assert!(it.timers.is_empty());

        clock.advance_ms(10_000);
        it.fire_due_timers();
        assert!(!it.latch().tap_timed_out);
        assert!(!it.latch().double_tap_timed_out);
    }

    #[test]
    fn test_restarting_tap_timer_cancels_previous() {
        let (mut it, _) = interaction(unthrottled(), Bounds::new(0.0, 0.0, 100.0, 100.0));

        it.start_tap_timer();
        it.start_tap_timer();

        assert_eq!(it.timers.len(), 1);
    }
}

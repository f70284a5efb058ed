//! Interaction controller - the public entry point
//!
//! Owns an [`Interaction`] plus the active mouse and touch strategies, and
//! routes host events to them.
//!
//! # API
//!
//! - `new(config, layout)` / `try_new` - Create (try_new validates the config)
//! - `mount()` / `unmount()` - Attach and detach listeners
//! - `handle_mouse(target, event)` - Dispatch a mouse event
//! - `handle_touch(event)` - Dispatch a touch event
//! - `handle_window(event)` - Resize/load resynchronization
//! - `poll()` - Fire due timers and honour refresh requests
//! - `set_mouse_activation` / `set_touch_activation` / `update_config` - Switch at runtime
//! - `attach_target(fn)` - Register a render target (returns cleanup)
//! - `on_update(fn)` - Callback after every accepted update
//!
//! # Example
//!
//! ```ignore
//! use spark_input_position::{InteractionConfig, InteractionController, SharedLayout};
//!
//! let layout = SharedLayout::new(Bounds::new(0.0, 0.0, 400.0, 400.0));
//! let mut controller = InteractionController::new(InteractionConfig::default(), layout.clone());
//! controller.mount();
//!
//! let _ = controller.handle_mouse(Target::Region, &MouseEvent::down(40.0, 50.0));
//! let _ = controller.handle_mouse(Target::Region, &MouseEvent::up(40.0, 50.0));
//! assert!(controller.is_active());
//! ```

use std::rc::Rc;
use std::time::Duration;

use spark_signals::Signal;

use crate::config::{InteractionConfig, MouseActivation, TouchActivation};
use crate::engine::interaction::{InputLatch, Interaction};
use crate::engine::listeners::Listeners;
use crate::error::ConfigResult;
use crate::layout::{ItemRef, LayoutSource};
use crate::pipeline::{RefreshHandle, Snapshot};
use crate::state::events::{EventMask, MouseEvent, Response, Target, TouchEvent, WindowEvent};
use crate::state::mouse::{MouseDownActivation, MouseHandlers};
use crate::state::timers::{Clock, MonotonicClock};
use crate::state::touch::TouchHandlers;
use crate::types::{InteractionState, Position};

/// Window events the controller always listens to while mounted.
const WINDOW_EVENTS: EventMask = EventMask::RESIZE.union(EventMask::LOAD);

pub struct InteractionController {
    interaction: Interaction,
    mouse: &'static dyn MouseHandlers,
    touch: &'static dyn TouchHandlers,
    mounted: bool,
}

impl InteractionController {
    /// Create a controller on the wall clock.
    ///
    /// The configuration is used as given (a failing
    /// [`InteractionConfig::validate`] is only logged).
    pub fn new(config: InteractionConfig, layout: impl LayoutSource + 'static) -> Self {
        Self::with_clock(config, layout, Rc::new(MonotonicClock::new()))
    }

    /// Create a controller on a custom clock.
    pub fn with_clock(
        config: InteractionConfig,
        layout: impl LayoutSource + 'static,
        clock: Rc<dyn Clock>,
    ) -> Self {
        if let Err(error) = config.validate() {
            log::warn!("accepting configuration that fails validation: {error}");
        }
        let mouse = config.mouse_activation_method.handlers();
        let touch = config.touch_activation_method.handlers();
        Self {
            interaction: Interaction::new(config, Box::new(layout), clock),
            mouse,
            touch,
            mounted: false,
        }
    }

    /// Validate `config` before creating the controller.
    pub fn try_new(config: InteractionConfig, layout: impl LayoutSource + 'static) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::new(config, layout))
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Attach listeners and read the initial geometry.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        log::debug!(
            "mount: mouse={}, touch={}",
            self.interaction.config.mouse_activation_method,
            self.interaction.config.touch_activation_method
        );
        self.mounted = true;
        self.attach_strategies();
        self.interaction.listeners.attach(Target::Window, WINDOW_EVENTS);

        self.interaction.refresh = true;
        self.interaction.refresh_position();
    }

    /// Detach every listener and disarm every timer. Safe to call twice.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        log::debug!("unmount");
        self.mounted = false;
        self.interaction.listeners.clear();
        self.interaction.clear_timers();
        self.interaction.latch = InputLatch::default();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn attach_strategies(&mut self) {
        let listeners = &mut self.interaction.listeners;
        listeners.attach(Target::Region, self.mouse.listens());
        listeners.attach(Target::Region, self.touch.listens());
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Fire due timers and honour a pending refresh request.
    pub fn poll(&mut self) {
        self.interaction.fire_due_timers();
        if self.mounted && self.interaction.projection.refresh_handle().take() {
            log::debug!("refresh requested");
            self.interaction.refresh_position();
        }
    }

    /// Dispatch a mouse event delivered on `target`. Due timers and refresh
    /// requests are serviced first, as in [`poll`](Self::poll).
    ///
    /// Returns [`Response::Ignored`] if nothing is listening for it there.
    pub fn handle_mouse(&mut self, target: Target, event: &MouseEvent) -> Response {
        self.poll();
        if !self.interaction.listeners.is_attached(target, event.kind.mask()) {
            return Response::Ignored;
        }
        self.mouse.dispatch(&mut self.interaction, event)
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) -> Response {
        self.poll();
        if !self.interaction.listeners.is_attached(Target::Region, event.kind.mask()) {
            return Response::Ignored;
        }
        self.touch.dispatch(&mut self.interaction, event)
    }

    /// Resynchronize geometry after a viewport resize or load.
    pub fn handle_window(&mut self, event: WindowEvent) -> Response {
        self.poll();
        if !self.interaction.listeners.is_attached(Target::Window, event.mask()) {
            return Response::Ignored;
        }
        self.interaction.refresh_position();
        Response::Handled
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    pub fn activate(&mut self, position: Position) {
        self.interaction.activate(position);
    }

    pub fn deactivate(&mut self) {
        self.interaction.deactivate();
    }

    pub fn toggle_active(&mut self, position: Position) {
        self.interaction.toggle_active(position);
    }

    /// Full position update. Returns false if dropped by the throttle.
    pub fn set_position(&mut self, position: Position, update_item: bool, activate: bool, center_item: bool) -> bool {
        self.interaction.set_position(position, update_item, activate, center_item)
    }

    pub fn set_passive_position(&mut self, position: Position) {
        self.interaction.set_passive_position(position);
    }

    pub fn refresh_position(&mut self) {
        self.interaction.refresh_position();
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &InteractionConfig {
        self.interaction.config()
    }

    pub fn set_mouse_activation(&mut self, method: MouseActivation) {
        if method == self.interaction.config.mouse_activation_method {
            return;
        }
        log::debug!(
            "switch mouse activation {} -> {}",
            self.interaction.config.mouse_activation_method,
            method
        );

        let mounted = self.mounted;
        if mounted {
            self.interaction.listeners.detach(Target::Region, self.mouse.listens());
            self.interaction.listeners.detach(Target::Window, EventMask::MOUSE);
        }
        self.interaction.latch.reset_mouse();

        self.interaction.config.mouse_activation_method = method;
        self.mouse = method.handlers();
        if mounted {
            self.attach_strategies();
        }
    }

    pub fn set_touch_activation(&mut self, method: TouchActivation) {
        if method == self.interaction.config.touch_activation_method {
            return;
        }
        log::debug!(
            "switch touch activation {} -> {}",
            self.interaction.config.touch_activation_method,
            method
        );

        let mounted = self.mounted;
        if mounted {
            self.interaction.listeners.detach(Target::Region, self.touch.listens());
        }
        self.interaction.reset_touch();

        self.interaction.config.touch_activation_method = method;
        self.touch = method.handlers();
        if mounted {
            self.attach_strategies();
        }
    }

    /// Replace the configuration, switching strategies where the activation
    /// methods changed.
    ///
    /// A changed update interval drops the running cooldown. Turning
    /// `mouse_down_allow_outside` off ends an outside press.
    pub fn update_config(&mut self, config: InteractionConfig) {
        if let Err(error) = config.validate() {
            log::warn!("accepting configuration that fails validation: {error}");
        }
        let (mouse, touch) = (config.mouse_activation_method, config.touch_activation_method);
        let current = &self.interaction.config;
        let interval_changed = current.min_update_speed_in_ms != config.min_update_speed_in_ms;
        let outside_disabled = current.mouse_down_allow_outside && !config.mouse_down_allow_outside;
        self.interaction.config = InteractionConfig {
            mouse_activation_method: current.mouse_activation_method,
            touch_activation_method: current.touch_activation_method,
            ..config
        };

        if interval_changed {
            self.interaction.reset_refresh_cooldown();
        }
        if outside_disabled && self.interaction.latch.mouse_outside {
            log::debug!("outside tracking disabled during a press");
            MouseDownActivation::stop_outside_tracking(&mut self.interaction);
            self.interaction.deactivate();
        }
        self.set_mouse_activation(mouse);
        self.set_touch_activation(touch);
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &InteractionState {
        self.interaction.state()
    }

    pub fn is_active(&self) -> bool {
        self.interaction.state.active
    }

    /// Reactive view of the state, updated after every accepted update.
    pub fn state_signal(&self) -> Signal<InteractionState> {
        self.interaction.projection.signal()
    }

    /// Register a render target. Returns cleanup function.
    pub fn attach_target<F>(&self, target: F) -> impl FnOnce() + use<F>
    where
        F: FnMut(&Snapshot<'_>) + 'static,
    {
        self.interaction.projection.attach(target)
    }

    /// Invoke `callback` with the full state after every accepted update.
    pub fn on_update<F>(&mut self, callback: F)
    where
        F: FnMut(&InteractionState) + 'static,
    {
        self.interaction.projection.set_on_update(Some(Box::new(callback)));
    }

    pub fn item_ref(&self) -> &ItemRef {
        self.interaction.item_ref()
    }

    pub fn refresh_handle(&self) -> &RefreshHandle {
        self.interaction.projection.refresh_handle()
    }

    pub fn listeners(&self) -> &Listeners {
        &self.interaction.listeners
    }

    pub fn latch(&self) -> &InputLatch {
        self.interaction.latch()
    }

    /// Current time on the controller's clock.
    pub fn now(&self) -> Duration {
        self.interaction.clock.now()
    }

    /// When the next timer is due, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.interaction.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.interaction.timers.len()
    }
}

impl Drop for InteractionController {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::layout::SharedLayout;
    use crate::state::timers::ManualClock;
    use crate::types::{Bounds, Dimensions};

    fn controller(config: InteractionConfig) -> (InteractionController, ManualClock) {
        let clock = ManualClock::new();
        let layout = SharedLayout::new(Bounds::new(0.0, 0.0, 400.0, 400.0));
        let controller = InteractionController::with_clock(config, layout, Rc::new(clock.clone()));
        (controller, clock)
    }

    fn unthrottled() -> InteractionConfig {
        InteractionConfig {
            min_update_speed_in_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_mount_attaches_strategy_and_window_listeners() {
        let (mut c, _) = controller(unthrottled());
        assert!(c.listeners().is_empty());

        c.mount();

        assert!(c.listeners().is_attached(Target::Region, MouseActivation::Click.handlers().listens()));
        assert!(c.listeners().is_attached(Target::Region, EventMask::TOUCH));
        assert_eq!(c.listeners().attached(Target::Window), WINDOW_EVENTS);
        assert_eq!(c.state().element_dimensions, Dimensions::new(400.0, 400.0));
    }

    #[test]
    fn test_events_before_mount_are_ignored() {
        let (mut c, _) = controller(unthrottled());

        let response = c.handle_mouse(Target::Region, &MouseEvent::down(10.0, 10.0));

        assert_eq!(response, Response::Ignored);
    }

    #[test]
    fn test_unmount_clears_listeners_and_timers() {
        let (mut c, _) = controller(InteractionConfig::default());
        c.mount();
        let _ = c.handle_touch(&TouchEvent::start(10.0, 10.0));
        assert!(c.pending_timers() > 0);

        c.unmount();
        c.unmount();

        assert!(c.listeners().is_empty());
        assert_eq!(c.pending_timers(), 0);
        assert_eq!(c.handle_touch(&TouchEvent::end(10.0, 10.0)), Response::Ignored);
    }

    #[test]
    fn test_unattached_event_kind_is_ignored() {
        let (mut c, _) = controller(unthrottled());
        c.mount();

        let response = c.handle_mouse(Target::Region, &MouseEvent::double_click(10.0, 10.0));

        assert_eq!(response, Response::Ignored);
        assert!(!c.is_active());
    }

    #[test]
    fn test_switch_mouse_activation_swaps_listeners() {
        let (mut c, _) = controller(unthrottled());
        c.mount();

        c.set_mouse_activation(MouseActivation::Hover);

        assert!(c.listeners().is_attached(Target::Region, EventMask::MOUSE_ENTER));
        assert!(c.listeners().is_attached(Target::Region, EventMask::TOUCH));
        let _ = c.handle_mouse(Target::Region, &MouseEvent::enter(5.0, 5.0));
        assert!(c.is_active());

        c.set_mouse_activation(MouseActivation::Click);
        assert!(!c.listeners().is_attached(Target::Region, EventMask::MOUSE_ENTER));
        assert_eq!(
            c.handle_mouse(Target::Region, &MouseEvent::enter(5.0, 5.0)),
            Response::Ignored
        );
    }

    #[test]
    fn test_switch_touch_activation_disarms_timers() {
        let (mut c, clock) = controller(unthrottled());
        c.mount();
        c.set_touch_activation(TouchActivation::LongTouch);
        let _ = c.handle_touch(&TouchEvent::start(10.0, 10.0));
        assert_eq!(c.pending_timers(), 1);

        c.set_touch_activation(TouchActivation::Tap);
        assert_eq!(c.pending_timers(), 0);
        assert!(!c.latch().touched);

        clock.advance_ms(1000);
        c.poll();
        assert!(!c.is_active());
    }

    #[test]
    fn test_update_config_switches_methods() {
        let (mut c, _) = controller(unthrottled());
        c.mount();

        c.update_config(InteractionConfig {
            mouse_activation_method: MouseActivation::MouseDown,
            touch_activation_method: TouchActivation::Touch,
            track_passive_position: true,
            ..unthrottled()
        });

        assert_eq!(c.config().mouse_activation_method, MouseActivation::MouseDown);
        assert!(c.config().track_passive_position);
        assert!(c.listeners().is_attached(Target::Region, EventMask::WHEEL));
        let _ = c.handle_touch(&TouchEvent::start(10.0, 10.0));
        assert!(c.is_active());
    }

    #[test]
    fn test_refresh_request_honoured_on_poll() {
        let config = InteractionConfig {
            track_item_position: true,
            center_item_on_load: true,
            item_position_limit_by_size: true,
            ..unthrottled()
        };
        let (mut c, _) = controller(config);
        c.mount();
        assert_eq!(c.state().item_position, Position::ZERO);

        let _cleanup = c.attach_target(|snapshot| {
            if !snapshot.item_ref.is_mounted() {
                snapshot.item_ref.mount(Dimensions::new(800.0, 600.0));
                snapshot.refresh.request();
            }
        });
        c.refresh_position();
        c.poll();

        assert_eq!(c.state().item_dimensions, Dimensions::new(800.0, 600.0));
        assert_eq!(c.state().item_position, Position::new(-200.0, -100.0));
    }

    #[test]
    fn test_refresh_request_honoured_on_dispatch() {
        let config = InteractionConfig {
            track_item_position: true,
            center_item_on_load: true,
            item_position_limit_by_size: true,
            ..unthrottled()
        };
        let (mut c, _) = controller(config);
        c.mount();

        c.item_ref().mount(Dimensions::new(800.0, 800.0));
        c.refresh_handle().request();
        let _ = c.handle_mouse(Target::Region, &MouseEvent::move_to(10.0, 10.0));

        assert!(!c.refresh_handle().is_requested());
        assert_eq!(c.state().item_position, Position::new(-200.0, -200.0));
    }

    #[test]
    fn test_enabling_throttle_at_runtime_keeps_updates_flowing() {
        let (mut c, clock) = controller(unthrottled());
        c.mount();

        c.update_config(InteractionConfig {
            min_update_speed_in_ms: 16,
            ..unthrottled()
        });
        clock.advance_ms(500);
        c.poll();

        assert!(c.set_position(Position::new(10.0, 10.0), false, true, false));
        assert!(c.is_active());

        clock.advance_ms(16);
        let _ = c.handle_mouse(Target::Region, &MouseEvent::down(20.0, 20.0));
        let _ = c.handle_mouse(Target::Region, &MouseEvent::up(20.0, 20.0));
        assert!(!c.is_active());
    }

    #[test]
    fn test_changing_interval_drops_running_cooldown() {
        let (mut c, _) = controller(InteractionConfig {
            min_update_speed_in_ms: 1000,
            ..Default::default()
        });
        c.mount();
        assert!(!c.set_position(Position::new(10.0, 10.0), false, false, false));

        c.update_config(InteractionConfig {
            min_update_speed_in_ms: 50,
            ..Default::default()
        });

        assert!(c.set_position(Position::new(10.0, 10.0), false, false, false));
    }

    #[test]
    fn test_activate_after_unmount_is_not_throttled() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.mount();

        c.unmount();
        clock.advance_ms(100);
        c.activate(Position::new(10.0, 10.0));

        assert!(c.is_active());
    }

    #[test]
    fn test_disabling_outside_mode_ends_outside_press() {
        let (mut c, _) = controller(InteractionConfig {
            mouse_activation_method: MouseActivation::MouseDown,
            mouse_down_allow_outside: true,
            ..unthrottled()
        });
        c.mount();
        let _ = c.handle_mouse(Target::Region, &MouseEvent::down(390.0, 10.0));
        let _ = c.handle_mouse(Target::Region, &MouseEvent::leave(401.0, 10.0));
        assert!(c.latch().mouse_outside);

        c.update_config(InteractionConfig {
            mouse_activation_method: MouseActivation::MouseDown,
            ..unthrottled()
        });

        assert!(!c.latch().mouse_outside);
        assert!(!c.is_active());
        assert_eq!(c.listeners().attached(Target::Window), WINDOW_EVENTS);
        assert_eq!(
            c.handle_mouse(Target::Window, &MouseEvent::up(450.0, 10.0)),
            Response::Ignored
        );
    }

    #[test]
    fn test_on_update_and_signal_follow_state() {
        let (mut c, _) = controller(unthrottled());
        let updates = Rc::new(Cell::new(0));
        let updates_clone = updates.clone();
        c.on_update(move |_| updates_clone.set(updates_clone.get() + 1));
        c.mount();

        c.activate(Position::new(20.0, 30.0));

        assert_eq!(updates.get(), 2);
        let state = c.state_signal().get();
        assert!(state.active);
        assert_eq!(state.active_position, Position::new(20.0, 30.0));
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = InteractionConfig {
            click_move_limit: -1.0,
            ..Default::default()
        };
        let layout = SharedLayout::new(Bounds::new(0.0, 0.0, 10.0, 10.0));

        assert!(InteractionController::try_new(config, layout).is_err());
    }

    #[test]
    fn test_new_keeps_config_that_fails_validation() {
        let config = InteractionConfig {
            click_move_limit: -1.0,
            ..unthrottled()
        };
        assert!(config.validate().is_err());

        let (c, _) = controller(config);

        assert_eq!(c.config().click_move_limit, -1.0);
    }

    #[test]
    fn test_window_resize_rereads_geometry() {
        let clock = ManualClock::new();
        let layout = SharedLayout::new(Bounds::new(0.0, 0.0, 400.0, 400.0));
        let mut c = InteractionController::with_clock(unthrottled(), layout.clone(), Rc::new(clock));
        c.mount();

        layout.set(Bounds::new(10.0, 10.0, 200.0, 100.0));
        let response = c.handle_window(WindowEvent::Resize);

        assert_eq!(response, Response::Handled);
        assert_eq!(c.state().element_dimensions, Dimensions::new(200.0, 100.0));
    }
}

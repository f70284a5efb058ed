//! Touch activation strategies
//!
//! One zero-sized strategy per [`TouchActivation`] mode, implementing
//! [`TouchHandlers`]. Every mode listens to the full touch set.
//!
//! `touched` is set on start and cleared on end and cancel. Cancel is the
//! universal abort: it disarms every touch timer, clears the latch and
//! deactivates, whatever the mode.
//!
//! Handlers ask the host to prevent the native default whenever the event is
//! cancelable. The exception is a move while inactive, which is left alone
//! so the page can still scroll.
//!
//! | Mode | Mechanism |
//! |------|-----------|
//! | `Tap` | toggle on end if the tap timer has not fired |
//! | `DoubleTap` | two taps within the double-tap window toggle |
//! | `Touch` | active exactly while touched |
//! | `LongTouch` | toggle at the touch-down point after holding still |

use crate::config::TouchActivation;
use crate::engine::interaction::{Interaction, TimerSlot};
use crate::state::events::{EventMask, Response, TouchEvent, TouchEventKind};

// =============================================================================
// HANDLER TRAIT
// =============================================================================

/// Event handlers of one touch activation mode.
pub trait TouchHandlers {
    fn listens(&self) -> EventMask {
        EventMask::TOUCH
    }

    fn touch_start(&self, it: &mut Interaction, event: &TouchEvent) -> Response;

    fn touch_end(&self, it: &mut Interaction, event: &TouchEvent) -> Response;

    fn touch_move(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        if !it.state.active {
            return Response::Handled;
        }
        let Some(position) = event.first_touch() else {
            return Response::Handled;
        };
        let touched = it.latch.touched;
        it.set_position(position, touched, false, false);
        Response::prevent_if(event.cancelable)
    }

    fn touch_cancel(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        it.reset_touch();
        it.deactivate();
        Response::prevent_if(event.cancelable)
    }

    fn dispatch(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        match event.kind {
            TouchEventKind::Start => self.touch_start(it, event),
            TouchEventKind::End => self.touch_end(it, event),
            TouchEventKind::Move => self.touch_move(it, event),
            TouchEventKind::Cancel => self.touch_cancel(it, event),
        }
    }
}

impl TouchActivation {
    /// The strategy implementing this mode.
    pub fn handlers(&self) -> &'static dyn TouchHandlers {
        match self {
            Self::Tap => &TapActivation,
            Self::DoubleTap => &DoubleTapActivation,
            Self::Touch => &TouchDownActivation,
            Self::LongTouch => &LongTouchActivation,
        }
    }
}

fn begin_tap(it: &mut Interaction) {
    it.latch.touched = true;
    it.latch.just_touched = true;
    it.start_tap_timer();
}

/// Clears the touch latch. Returns false when the tap window already closed,
/// in which case the lift is not a tap.
fn finish_tap(it: &mut Interaction) -> bool {
    it.latch.touched = false;
    it.latch.just_touched = false;

    if it.latch.tap_timed_out {
        it.latch.tap_timed_out = false;
        return false;
    }
    it.cancel_timer_slot(TimerSlot::Tap);
    true
}

/// Move handling shared by the tap modes: the first move after touch start
/// positions without dragging the item.
fn tap_move(it: &mut Interaction, event: &TouchEvent) -> Response {
    if !it.state.active {
        return Response::Handled;
    }
    let Some(position) = event.first_touch() else {
        return Response::Handled;
    };
    let dragging = it.latch.touched && !it.latch.just_touched;
    it.set_position(position, dragging, false, false);
    it.latch.just_touched = false;
    Response::prevent_if(event.cancelable)
}

// =============================================================================
// TAP
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TapActivation;

impl TouchHandlers for TapActivation {
    fn touch_start(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        begin_tap(it);
        Response::prevent_if(event.cancelable)
    }

    fn touch_end(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        if finish_tap(it) {
            if let Some(position) = event.first_changed() {
                it.toggle_active(position);
            }
        }
        Response::prevent_if(event.cancelable)
    }

    fn touch_move(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        tap_move(it, event)
    }
}

// =============================================================================
// DOUBLE TAP
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct DoubleTapActivation;

impl TouchHandlers for DoubleTapActivation {
    fn touch_start(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        begin_tap(it);
        Response::prevent_if(event.cancelable)
    }

    fn touch_end(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        if !finish_tap(it) {
            return Response::prevent_if(event.cancelable);
        }

        if it.latch.tapped && !it.latch.double_tap_timed_out {
            it.cancel_timer_slot(TimerSlot::DoubleTap);
            if let Some(position) = event.first_changed() {
                it.toggle_active(position);
            }
            it.latch.tapped = false;
            return Response::prevent_if(event.cancelable);
        }

        // First tap of a pair, or a second one that came too late.
        it.latch.tap_timed_out = false;
        it.latch.double_tap_timed_out = false;
        it.latch.tapped = true;
        it.start_double_tap_timer();
        Response::prevent_if(event.cancelable)
    }

    fn touch_move(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        tap_move(it, event)
    }
}

// =============================================================================
// TOUCH
// =============================================================================

/// Active exactly while a finger is down.
#[derive(Debug, Clone, Copy)]
pub struct TouchDownActivation;

impl TouchHandlers for TouchDownActivation {
    fn touch_start(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        it.latch.touched = true;
        if let Some(position) = event.first_touch() {
            it.activate(position);
        }
        Response::prevent_if(event.cancelable)
    }

    fn touch_end(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        it.latch.touched = false;
        it.deactivate();
        Response::prevent_if(event.cancelable)
    }
}

// =============================================================================
// LONG TOUCH
// =============================================================================

/// Toggle after holding still for `long_touch_duration_in_ms`.
///
/// Movement beyond `long_touch_move_limit` (difference of `x + y` from the
/// touch-down point) disarms the pending toggle.
#[derive(Debug, Clone, Copy)]
pub struct LongTouchActivation;

impl TouchHandlers for LongTouchActivation {
    fn touch_start(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        it.latch.touched = true;
        it.cancel_timer_slot(TimerSlot::LongTouch);

        if let Some(position) = event.first_touch() {
            it.latch.long_touch_start = position.axis_sum();
            it.start_long_touch_timer(position);
        }
        Response::prevent_if(event.cancelable)
    }

    fn touch_end(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        it.latch.touched = false;
        it.cancel_timer_slot(TimerSlot::LongTouch);
        Response::prevent_if(event.cancelable)
    }

    fn touch_move(&self, it: &mut Interaction, event: &TouchEvent) -> Response {
        let Some(position) = event.first_touch() else {
            return Response::Handled;
        };

        let diff = (it.latch.long_touch_start - position.axis_sum()).abs();
        if diff > it.config.long_touch_move_limit {
            it.cancel_timer_slot(TimerSlot::LongTouch);
        }

        if !it.state.active {
            return Response::Handled;
        }
        let touched = it.latch.touched;
        it.set_position(position, touched, false, false);
        Response::prevent_if(event.cancelable)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::InteractionConfig;
    use crate::layout::SharedLayout;
    use crate::state::timers::ManualClock;
    use crate::types::{Bounds, Position};

    fn interaction() -> (Interaction, ManualClock) {
        let clock = ManualClock::new();
        let config = InteractionConfig {
            min_update_speed_in_ms: 0,
            ..Default::default()
        };
        let it = Interaction::new(
            config,
            Box::new(SharedLayout::new(Bounds::new(0.0, 0.0, 400.0, 400.0))),
            Rc::new(clock.clone()),
        );
        (it, clock)
    }

    /// Fire due timers, then dispatch, the way the controller does.
    fn run(mode: &dyn TouchHandlers, it: &mut Interaction, event: TouchEvent) -> Response {
        it.fire_due_timers();
        mode.dispatch(it, &event)
    }

    #[test]
    fn test_every_mode_listens_to_all_touch_events() {
        for mode in TouchActivation::ALL {
            assert_eq!(mode.handlers().listens(), EventMask::TOUCH, "{mode}");
        }
    }

    #[test]
    fn test_tap_within_window_toggles() {
        let (mut it, clock) = interaction();
        let tap = TapActivation;

        let _ = run(&tap, &mut it, TouchEvent::start(10.0, 10.0));
        clock.advance_ms(100);
        let response = run(&tap, &mut it, TouchEvent::end(12.0, 14.0));

        assert!(it.state.active);
        assert_eq!(it.state.active_position, Position::new(12.0, 14.0));
        assert_eq!(response, Response::PreventDefault);
        assert!(it.timers.is_empty());
    }

    #[test]
    fn test_tap_modes_first_move_after_start_does_not_drag() {
        let modes: [&dyn TouchHandlers; 2] = [&TapActivation, &DoubleTapActivation];
        for mode in modes {
            let (mut it, _) = interaction();
            it.config.track_item_position = true;
            it.activate(Position::new(100.0, 100.0));

            let _ = run(mode, &mut it, TouchEvent::start(100.0, 100.0));
            let _ = run(mode, &mut it, TouchEvent::move_to(150.0, 100.0));
            assert!(!it.latch.just_touched);
            assert_eq!(it.state.item_position, Position::ZERO);

            let _ = run(mode, &mut it, TouchEvent::move_to(160.0, 100.0));
            assert_eq!(it.state.item_position, Position::new(10.0, 0.0));
        }
    }

    #[test]
    fn test_tap_after_window_does_not_toggle() {
        let (mut it, clock) = interaction();
        let tap = TapActivation;

        let _ = run(&tap, &mut it, TouchEvent::start(10.0, 10.0));
        clock.advance_ms(181);
        let _ = run(&tap, &mut it, TouchEvent::end(10.0, 10.0));

        assert!(!it.state.active);
        assert!(!it.latch.tap_timed_out);
    }

    #[test]
    fn test_tap_end_cancels_timer_before_it_fires() {
        let (mut it, clock) = interaction();
        let tap = TapActivation;

        let _ = run(&tap, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&tap, &mut it, TouchEvent::end(10.0, 10.0));
        clock.advance_ms(1000);
        it.fire_due_timers();

        // A stale timer would mark the next tap as timed out.
        assert!(it.state.active);
        assert!(!it.latch.tap_timed_out);
        let _ = run(&tap, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&tap, &mut it, TouchEvent::end(10.0, 10.0));
        assert!(!it.state.active);
    }

    #[test]
    fn test_tap_move_inactive_is_not_prevented() {
        let (mut it, _) = interaction();

        let response = run(&TapActivation, &mut it, TouchEvent::move_to(10.0, 10.0));

        assert_eq!(response, Response::Handled);
    }

    #[test]
    fn test_non_cancelable_event_is_not_prevented() {
        let (mut it, _) = interaction();

        let response = run(
            &TapActivation,
            &mut it,
            TouchEvent::start(10.0, 10.0).with_cancelable(false),
        );

        assert_eq!(response, Response::Handled);
    }

    #[test]
    fn test_double_tap_toggles_on_second_tap() {
        let (mut it, clock) = interaction();
        let mode = DoubleTapActivation;

        let _ = run(&mode, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&mode, &mut it, TouchEvent::end(10.0, 10.0));
        assert!(!it.state.active);
        assert!(it.latch.tapped);

        clock.advance_ms(150);
        let _ = run(&mode, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&mode, &mut it, TouchEvent::end(20.0, 20.0));

        assert!(it.state.active);
        assert!(!it.latch.tapped);
        assert!(it.timers.is_empty());
    }

    #[test]
    fn test_double_tap_too_slow_starts_new_pair() {
        let (mut it, clock) = interaction();
        let mode = DoubleTapActivation;

        let _ = run(&mode, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&mode, &mut it, TouchEvent::end(10.0, 10.0));
        clock.advance_ms(500);
        let _ = run(&mode, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&mode, &mut it, TouchEvent::end(10.0, 10.0));

        assert!(!it.state.active);
        assert!(it.latch.tapped);
        assert!(it.latch.double_tap_timer.is_some());

        clock.advance_ms(100);
        let _ = run(&mode, &mut it, TouchEvent::start(10.0, 10.0));
        let _ = run(&mode, &mut it, TouchEvent::end(10.0, 10.0));
        assert!(it.state.active);
    }

    #[test]
    fn test_touch_mode_active_while_touched() {
        let (mut it, _) = interaction();
        let mode = TouchDownActivation;

        let _ = run(&mode, &mut it, TouchEvent::start(10.0, 10.0));
        assert!(it.state.active);
        let _ = run(&mode, &mut it, TouchEvent::move_to(30.0, 40.0));
        assert_eq!(it.state.active_position, Position::new(30.0, 40.0));
        let _ = run(&mode, &mut it, TouchEvent::end(30.0, 40.0));
        assert!(!it.state.active);
    }

    #[test]
    fn test_long_touch_toggles_at_touch_down_point() {
        let (mut it, clock) = interaction();
        let mode = LongTouchActivation;

        let _ = run(&mode, &mut it, TouchEvent::start(50.0, 60.0));
        let _ = run(&mode, &mut it, TouchEvent::move_to(52.0, 61.0));
        clock.advance_ms(500);
        it.fire_due_timers();

        assert!(it.state.active);
        assert_eq!(it.state.active_position, Position::new(50.0, 60.0));
    }

    #[test]
    fn test_long_touch_released_early_never_toggles() {
        let (mut it, clock) = interaction();
        let mode = LongTouchActivation;

        let _ = run(&mode, &mut it, TouchEvent::start(50.0, 60.0));
        clock.advance_ms(300);
        let _ = run(&mode, &mut it, TouchEvent::end(50.0, 60.0));
        clock.advance_ms(1000);
        it.fire_due_timers();

        assert!(!it.state.active);
        assert!(it.timers.is_empty());
    }

    #[test]
    fn test_long_touch_movement_disarms() {
        let (mut it, clock) = interaction();
        let mode = LongTouchActivation;

        let _ = run(&mode, &mut it, TouchEvent::start(50.0, 60.0));
        let _ = run(&mode, &mut it, TouchEvent::move_to(60.0, 60.0));
        assert_eq!(it.latch.long_touch_timer, None);

        clock.advance_ms(1000);
        it.fire_due_timers();
        assert!(!it.state.active);
    }

    #[test]
    fn test_cancel_aborts_every_mode() {
        for mode in TouchActivation::ALL {
            let (mut it, _) = interaction();
            let handlers = mode.handlers();

            let _ = run(handlers, &mut it, TouchEvent::start(10.0, 10.0));
            it.activate(Position::new(10.0, 10.0));
            let _ = run(handlers, &mut it, TouchEvent::cancel());

            assert!(!it.state.active, "{mode}");
            assert!(!it.latch.touched, "{mode}");
            assert!(!it.latch.has_touch_timers(), "{mode}");
            assert!(it.timers.is_empty(), "{mode}");
        }
    }
}

//! Timers - clocks and cancellable scheduled tasks
//!
//! Tap, double-tap, long-touch and the refresh cooldown are all
//! fire-and-forget timers. Instead of threads they are entries in a
//! [`TimerQueue`] owned by the controller, keyed by a [`TimerId`] that the
//! arming strategy keeps so it can cancel synchronously.
//!
//! Due timers fire in deadline order when the controller is polled and
//! before every dispatched event, so a timer whose deadline has passed
//! always runs before the next event's handler.
//!
//! # Example
//!
//! ```ignore
//! use spark_input_position::state::timers::{ManualClock, TimerKind, TimerQueue};
//!
//! let clock = ManualClock::new();
//! let mut queue = TimerQueue::new();
//! let id = queue.schedule(TimerKind::Tap, clock.now() + Duration::from_millis(180));
//!
//! clock.advance_ms(200);
//! assert_eq!(queue.pop_due(clock.now()), Some((id, TimerKind::Tap)));
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::types::Position;

// =============================================================================
// CLOCKS
// =============================================================================

/// Monotonic time source, measured from an arbitrary fixed start.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time via `web_time::Instant` (std on native, `performance.now()`
/// on wasm).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: web_time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: web_time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// =============================================================================
// TIMER QUEUE
// =============================================================================

/// Handle to an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerKind {
    /// Tap window elapsed.
    Tap,
    /// Double-tap window elapsed.
    DoubleTap,
    /// Long-touch duration elapsed; toggles at the original touch-down point.
    LongTouch { position: Position },
    /// Throttle cooldown elapsed; the next position update is accepted.
    RefreshCooldown,
}

#[derive(Debug)]
struct TimerEntry {
    id: TimerId,
    deadline: Duration,
    kind: TimerKind,
}

/// Pending timers, fired earliest deadline first.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that becomes due at `deadline`.
    pub fn schedule(&mut self, kind: TimerKind, deadline: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry { id, deadline, kind });
        id
    }

    /// Disarm a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Remove and return the earliest timer due at `now`, if any.
    ///
    /// Timers with equal deadlines fire in the order they were armed.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, TimerKind)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| (entry.deadline, entry.id.0))
            .map(|(index, _)| index)?;

        let entry = self.entries.remove(index);
        Some((entry.id, entry.kind))
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Deadline of the next timer to fire, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Disarm everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance_ms(250);
        assert_eq!(other.now(), ms(250));
        other.set(ms(10));
        assert_eq!(clock.now(), ms(10));
    }

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(TimerKind::Tap, ms(180));

        assert_eq!(queue.pop_due(ms(179)), None);
        assert_eq!(queue.pop_due(ms(180)), Some((id, TimerKind::Tap)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_due_fires_earliest_first() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule(TimerKind::DoubleTap, ms(400));
        let early = queue.schedule(TimerKind::Tap, ms(180));
        let tie = queue.schedule(TimerKind::RefreshCooldown, ms(180));

        assert_eq!(queue.next_deadline(), Some(ms(180)));
        assert_eq!(queue.pop_due(ms(1000)).map(|(id, _)| id), Some(early));
        assert_eq!(queue.pop_due(ms(1000)).map(|(id, _)| id), Some(tie));
        assert_eq!(queue.pop_due(ms(1000)).map(|(id, _)| id), Some(late));
        assert_eq!(queue.pop_due(ms(1000)), None);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(TimerKind::LongTouch { position: Position::new(1.0, 2.0) }, ms(500));

        assert!(queue.is_armed(id));
        assert!(queue.cancel(id));
        assert!(!queue.is_armed(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.pop_due(ms(10_000)), None);
    }

    #[test]
    fn test_clear_disarms_everything() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::Tap, ms(1));
        queue.schedule(TimerKind::DoubleTap, ms(2));
        assert_eq!(queue.len(), 2);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }
}

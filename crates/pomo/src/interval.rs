//! Interval scheduler
//!
//! A deadline-driven periodic timer for a single-threaded event loop. The
//! loop asks [`IntervalScheduler::timeout`] how long it may block on input,
//! then calls [`IntervalScheduler::poll`] with the callback to run if a tick
//! is due. Because the callback is passed at every poll, the one that fires
//! is always the latest one.

use std::time::{Duration, Instant};

/// Periodic timer that fires at most once per delay while enabled
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    delay: Option<Duration>,
    next_due: Option<Instant>,
}

impl IntervalScheduler {
    /// Create a scheduler. `None` (or a zero delay) starts it disabled.
    pub fn new(delay: Option<Duration>, now: Instant) -> Self {
        let mut scheduler = Self {
            delay: None,
            next_due: None,
        };
        scheduler.set_delay(delay, now);
        scheduler
    }

    /// Change the delay.
    ///
    /// Setting the delay it already has is a no-op, so a running period keeps
    /// its phase. A different delay restarts the period from `now`; `None`
    /// cancels any pending tick.
    pub fn set_delay(&mut self, delay: Option<Duration>, now: Instant) {
        let delay = delay.filter(|d| !d.is_zero());
        if delay == self.delay {
            return;
        }

        self.delay = delay;
        self.next_due = delay.map(|d| now + d);
    }

    /// Current delay, `None` when disabled
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    pub fn is_enabled(&self) -> bool {
        self.delay.is_some()
    }

    /// How long until the next tick is due. `None` when disabled.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Fire `callback` if a tick is due at `now`. Returns whether it fired.
    ///
    /// At most one tick fires per poll. When the loop has fallen more than a
    /// whole period behind, the missed ticks are dropped and the next one is
    /// scheduled a full delay after `now`.
    pub fn poll<F: FnOnce()>(&mut self, now: Instant, callback: F) -> bool {
        let (Some(delay), Some(due)) = (self.delay, self.next_due) else {
            return false;
        };

        if now < due {
            return false;
        }

        let next = due + delay;
        self.next_due = Some(if next <= now { now + delay } else { next });

        callback();
        true
    }
}

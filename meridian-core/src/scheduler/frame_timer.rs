//! Frame timer
//!
//! Cooperative single-pending-tick scheduler. The owner feeds it the
//! current wall-clock time in milliseconds and the `should_animate()`
//! predicate; it answers with the deadline the owner should sleep until.
//! Deadlines always fall on interval boundaries so ticks do not drift with
//! wake-up latency.

/// Default redraw interval (one second)
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// Result of polling the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing scheduled (stale wake-up)
    Idle,
    /// Woken before the deadline
    NotDue { deadline_ms: u64 },
    /// Tick consumed: repaint now; `next_ms` is the rescheduled deadline
    Fired { next_ms: Option<u64> },
}

impl TickOutcome {
    /// Check if the caller should repaint
    pub fn redraw(&self) -> bool {
        matches!(self, TickOutcome::Fired { .. })
    }
}

/// Single pending-tick scheduler
#[derive(Debug, Clone)]
pub struct FrameTimer {
    interval_ms: u64,
    /// Absolute wall-clock deadline of the one pending tick
    pending: Option<u64>,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MS)
    }
}

impl FrameTimer {
    /// Create an idle timer; a zero interval is treated as 1 ms
    pub const fn new(interval_ms: u32) -> Self {
        let interval_ms = if interval_ms == 0 { 1 } else { interval_ms };
        Self {
            interval_ms: interval_ms as u64,
            pending: None,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms as u32
    }

    /// Deadline of the pending tick
    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Delay from `now_ms` to the next interval boundary, in `1..=interval`
    pub fn delay_to_boundary(&self, now_ms: u64) -> u64 {
        self.interval_ms - (now_ms % self.interval_ms)
    }

    /// Drop the pending tick, if any
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancel, then schedule at the next boundary if animating
    ///
    /// Call after every transition that may change `should_animate()`.
    pub fn reevaluate(&mut self, animate: bool, now_ms: u64) -> Option<u64> {
        self.cancel();
        if animate {
            self.pending = Some(now_ms + self.delay_to_boundary(now_ms));
        }
        self.pending
    }

    /// Handle a wake-up
    pub fn poll(&mut self, animate: bool, now_ms: u64) -> TickOutcome {
        let Some(deadline_ms) = self.pending else {
            return TickOutcome::Idle;
        };

        if now_ms < deadline_ms {
            return TickOutcome::NotDue { deadline_ms };
        }

        self.pending = None;
        let next_ms = if animate {
            self.reevaluate(true, now_ms)
        } else {
            None
        };

        TickOutcome::Fired { next_ms }
    }
}

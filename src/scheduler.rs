//! Time source and timer primitives shared by every exercise.
//!
//! Nothing here spawns threads or sleeps. Components own their timers and are
//! polled with the current clock reading from the UI loop, so a transition
//! can only happen on the thread that owns the state it mutates.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds since an arbitrary, per-clock origin
pub type Millis = u64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Monotonic wall clock anchored at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock for tests and headless runs. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: Millis) -> Millis {
        let next = self.now.get() + ms;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// One-shot timer with a single slot: arming replaces whatever was pending,
/// so an owner can never have two transitions in flight.
#[derive(Debug, Default)]
pub struct Timer {
    due: Option<Millis>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fire at `from + delay`, cancelling any pending fire.
    pub fn arm(&mut self, from: Millis, delay: Millis) {
        self.due = Some(from.saturating_add(delay));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn due(&self) -> Option<Millis> {
        self.due
    }

    /// Disarms and returns the deadline if it has passed
    pub fn fire(&mut self, now: Millis) -> Option<Millis> {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                Some(due)
            }
            _ => None,
        }
    }
}

/// Fixed-period driver: reports how many whole periods elapsed since the
/// last poll. Keeps running regardless of what the owner does with the ticks.
#[derive(Debug, Clone)]
pub struct Periodic {
    period: Millis,
    next: Option<Millis>,
}

impl Periodic {
    pub fn new(period: Millis) -> Self {
        Self {
            period: period.max(1),
            next: None,
        }
    }

    pub fn period(&self) -> Millis {
        self.period
    }

    /// The first poll only anchors the schedule.
    pub fn poll(&mut self, now: Millis) -> u64 {
        let next = match self.next {
            Some(next) => next,
            None => {
                self.next = Some(now + self.period);
                return 0;
            }
        };
        if now < next {
            return 0;
        }
        let fired = (now - next) / self.period + 1;
        self.next = Some(next + fired * self.period);
        fired
    }

    pub fn restart(&mut self, now: Millis) {
        self.next = Some(now + self.period);
    }
}

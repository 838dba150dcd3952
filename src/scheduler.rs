//! One-shot timers with explicit cancellation.
//!
//! The UI loop owns a [`TimerQueue`] and turns due timers into events; the
//! session only ever sees the [`Scheduler`] trait.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifies one scheduled firing. Never reused within a queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    /// Current time as the scheduler sees it.
    fn now(&self) -> Instant;
    /// Arrange for a firing `delay` from now.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;
    /// Drop a pending firing. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock for tests. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Deadline-ordered queue of pending timers.
#[derive(Debug)]
pub struct TimerQueue<C: Clock = SystemClock> {
    clock: C,
    next_id: u64,
    pending: Vec<(Instant, TimerHandle)>,
}

impl TimerQueue<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimerQueue<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerQueue<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|(at, _)| *at)
    }

    /// Time until the earliest deadline, zero if already due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline()
            .map(|at| at.saturating_duration_since(now))
    }

    /// Remove and return the earliest timer if its deadline has passed.
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        let now = self.clock.now();
        match self.pending.first() {
            Some((at, _)) if *at <= now => Some(self.pending.remove(0).1),
            _ => None,
        }
    }
}

impl<C: Clock> Scheduler for TimerQueue<C> {
    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let at = self.clock.now() + delay;
        // stable for equal deadlines: later schedules fire later
        let idx = self.pending.partition_point(|(t, _)| *t <= at);
        self.pending.insert(idx, (at, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|(_, h)| *h == handle) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }
}
